use crate::config::Config;
use crate::ir::{Diagram, Node, Selection};
use crate::layout::{Layout, Point, compute_layout};
use crate::panel::DetailPanel;

/// Interactions the page reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Pointer activation at a canvas-space position.
    Click(Point),
    /// Direct activation of a node by id.
    Select(String),
    /// The panel's close button.
    Dismiss,
}

type SelectHook = Box<dyn FnMut(&Node)>;
type CloseHook = Box<dyn FnMut()>;

/// Owns the one piece of mutable state, the selection, and derives everything
/// else from scratch on each render.
pub struct Shell {
    diagram: Diagram,
    config: Config,
    selection: Selection,
    on_node_select: Option<SelectHook>,
    on_close: Option<CloseHook>,
}

impl Shell {
    pub fn new(diagram: Diagram, config: Config) -> Self {
        Self {
            diagram,
            config,
            selection: Selection::none(),
            on_node_select: None,
            on_close: None,
        }
    }

    /// Observer for node activations; receives the full record.
    pub fn on_node_select(mut self, hook: impl FnMut(&Node) + 'static) -> Self {
        self.on_node_select = Some(Box::new(hook));
        self
    }

    /// Observer for panel dismissals.
    pub fn on_close(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_close = Some(Box::new(hook));
        self
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn layout(&self) -> Layout {
        compute_layout(&self.diagram, &self.selection, &self.config)
    }

    pub fn panel(&self) -> DetailPanel<'_> {
        DetailPanel::build(&self.diagram, &self.selection, &self.config.panel)
    }

    /// Applies `event`. Returns whether the selection changed.
    pub fn handle(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::Click(point) => self.click(point),
            UiEvent::Select(id) => self.select(&id),
            UiEvent::Dismiss => self.dismiss(),
        }
    }

    /// Resolves a click through the current layout. Misses leave the selection alone.
    pub fn click(&mut self, point: Point) -> bool {
        let layout = self.layout();
        let mut hit: Option<Node> = None;
        layout.activate(&self.diagram, point, |node| hit = Some(node.clone()));
        match hit {
            Some(node) => self.activate(&node),
            None => false,
        }
    }

    pub fn select(&mut self, id: &str) -> bool {
        match self.diagram.node(id).cloned() {
            Some(node) => self.activate(&node),
            None => {
                tracing::warn!(id, "ignoring selection of unknown node");
                false
            }
        }
    }

    pub fn dismiss(&mut self) -> bool {
        if !self.selection.is_some() {
            return false;
        }
        self.selection.clear();
        if let Some(hook) = self.on_close.as_mut() {
            hook();
        }
        tracing::debug!("selection cleared");
        true
    }

    fn activate(&mut self, node: &Node) -> bool {
        let changed = !self.selection.is(&node.id);
        self.selection.set(&node.id);
        if let Some(hook) = self.on_node_select.as_mut() {
            hook(node);
        }
        tracing::debug!(id = %node.id, changed, "node selected");
        changed
    }
}
