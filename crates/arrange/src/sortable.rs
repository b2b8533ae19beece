//! Registered containers.

use crate::animation::{AnimationSettings, AnimationStateManager};
use crate::group::{PullMode, ResolvedGroup};
use crate::hooks::{DefaultHooks, SortableHooks};
use crate::options::{CompiledSelectors, SortableOptions};
use crate::platform::Platform;
use crate::store::{Store, StoreKey};
use arrange_core::math::Vec2;
use arrange_dom::NodeId;

/// Handle to a registered container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SortableId(pub usize);

/// Everything needed to register a container.
pub struct SortableConfig {
    pub options: SortableOptions,
    pub hooks: Box<dyn SortableHooks>,
    pub store: Option<Box<dyn Store>>,
}

impl Default for SortableConfig {
    fn default() -> Self {
        Self {
            options: SortableOptions::default(),
            hooks: Box::new(DefaultHooks),
            store: None,
        }
    }
}

impl SortableConfig {
    pub fn new(options: SortableOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn with_hooks(mut self, hooks: impl SortableHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    pub fn with_store(mut self, store: impl Store + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }
}

impl From<SortableOptions> for SortableConfig {
    fn from(options: SortableOptions) -> Self {
        SortableConfig::new(options)
    }
}

/// A registered container and its per-container drag state.
pub(crate) struct Sortable {
    pub id: SortableId,
    pub element: NodeId,
    pub options: SortableOptions,
    pub selectors: CompiledSelectors,
    pub group: ResolvedGroup,
    /// Uses HTML5 drag and drop rather than the fallback ghost.
    pub native: bool,
    pub touch_start_threshold: u32,
    pub hooks: Box<dyn SortableHooks>,
    pub store: Option<Box<dyn Store>>,
    pub animation: AnimationStateManager,
    /// Element whose swap is ignored until this container's animation
    /// settles.
    pub ignore_while_animating: Option<NodeId>,
    /// Result of the last pull check made against this container.
    pub last_put_mode: Option<PullMode>,
    /// Pointer position at press, updated by the hover loop.
    pub last_pointer: Vec2,
}

impl Sortable {
    pub fn new(
        id: SortableId,
        element: NodeId,
        tag: &str,
        config: SortableConfig,
        platform: &Platform,
    ) -> Self {
        let SortableConfig {
            options,
            hooks,
            store,
        } = config;
        let mut sortable = Self {
            id,
            element,
            selectors: CompiledSelectors::default(),
            group: ResolvedGroup::default(),
            native: false,
            touch_start_threshold: 1,
            hooks,
            store,
            animation: AnimationStateManager::new(),
            ignore_while_animating: None,
            last_put_mode: None,
            last_pointer: Vec2::ZERO,
            options,
        };
        sortable.prepare(tag, platform);
        sortable
    }

    /// Derive compiled state from the options.
    pub fn prepare(&mut self, tag: &str, platform: &Platform) {
        self.selectors = self.options.compile(tag);
        self.group = self
            .options
            .group
            .as_ref()
            .map(|g| g.resolve())
            .unwrap_or_default();
        self.native = platform.native_drag && !self.options.force_fallback;
        self.touch_start_threshold = if self.native {
            1
        } else {
            self.options
                .touch_start_threshold
                .unwrap_or_else(|| platform.touch_start_threshold())
        };
    }

    pub fn group_name(&self) -> Option<&str> {
        self.group.name.as_deref()
    }

    pub fn store_key(&self) -> StoreKey<'_> {
        StoreKey {
            sortable: self.id,
            element: self.element,
            group: self.group_name(),
        }
    }

    pub fn animation_settings(&self) -> AnimationSettings {
        AnimationSettings {
            duration_ms: self.options.animation,
            easing: self.options.easing,
        }
    }
}
