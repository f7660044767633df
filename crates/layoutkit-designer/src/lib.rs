//! # LayoutKit Designer
//!
//! Layout geometry, interactive editing and rasterization for SKU marketing
//! layouts. A layout spec supplies the default geometry of every element; each
//! SKU document layers its own overrides and custom elements on top.
//!
//! ## Core Components
//!
//! ### Geometry
//! - **Resolver**: Merges spec geometry with per-SKU overrides
//! - **Transform**: Composes base transforms with rotation, parses them into affines
//! - **Viewport**: Converts between preview pixels and logical canvas units
//! - **Bounds**: Answers "where is this element" from custom elements, overrides
//!   or the painted preview
//!
//! ### Editing
//! - **Selection**: Selected and locked element keys
//! - **Alignment**: Align and distribute a multi-selection
//! - **Manipulation**: Drag, resize and rotate gestures with snapping and clamping
//! - **History**: Debounced snapshot undo/redo
//! - **Editor**: Ties the above to one open layout
//!
//! ### Rendering
//! - **Scene**: Resolved, z-ordered nodes for one layout instance
//! - **Renderer**: Paints a scene to a pixmap at any scale
//!
//! ## Architecture
//!
//! ```text
//! LayoutSpec + SkuDocument
//!   └── Resolver ── Scene ── Renderer ── pixels + measured node rects
//!                                              │
//! Editor ── Selection, Alignment, Manipulation ┴── BoundsProvider
//!   └── History
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use layoutkit_designer::{resolve_element, LayoutEditor};
//!
//! let geometry = resolve_element(&spec, &sku.document, "title")?;
//! let mut editor = LayoutEditor::new(spec, brand, sku, &settings, host);
//! editor.set_edit_mode(true);
//! ```

pub mod alignment;
pub mod assets;
pub mod bounds;
pub mod editor;
pub mod font_manager;
pub mod history;
pub mod manipulation;
pub mod renderer;
pub mod resolver;
pub mod scene;
pub mod selection_manager;
pub mod transform;
pub mod viewport;

pub use alignment::{align, distribute, Alignment, Distribution, Reposition};
pub use assets::{AssetSource, FsAssetSource, MemoryAssetSource};
pub use bounds::{BoundsProvider, BoundsSource, MeasuredSurface, RenderedSurface};
pub use editor::LayoutEditor;
pub use history::{CheckpointScheduler, DocumentHistory, UndoRedoManager, DEFAULT_HISTORY_LIMIT};
pub use manipulation::{
    GestureCommit, GestureKind, GestureState, GestureUpdate, ListenerRegistry,
    ManipulationConfig, ManipulationSession, Modifiers, PointerListenerHost, ResizeHandle,
};
pub use renderer::{to_rgba_image, RenderedFrame, Renderer, MAX_SCALE};
pub use resolver::{resolve, resolve_element, resolve_or};
pub use scene::{build_scene, Scene, SceneNode};
pub use selection_manager::SelectionSet;
pub use transform::{combine as combine_transform, Affine};
pub use viewport::Viewport;
