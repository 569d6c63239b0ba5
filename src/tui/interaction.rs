use ratatui::layout::Rect;

/// Click targets registered while rendering a frame.
///
/// Targets registered later sit on top (the modal is drawn after the page),
/// so lookups search from the end.
pub struct InteractionRegistry<Msg> {
    click_handlers: Vec<(Rect, Msg)>,
    /// While set, clicks outside this area are swallowed
    modal_area: Option<Rect>,
}

impl<Msg: Clone> Default for InteractionRegistry<Msg> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Msg: Clone> InteractionRegistry<Msg> {
    pub fn new() -> Self {
        Self {
            click_handlers: Vec::new(),
            modal_area: None,
        }
    }

    pub fn register_click(&mut self, rect: Rect, msg: Msg) {
        self.click_handlers.push((rect, msg));
    }

    /// Block everything outside `area` until the next clear
    pub fn set_modal_area(&mut self, area: Rect) {
        self.modal_area = Some(area);
    }

    pub fn find_click(&self, x: u16, y: u16) -> Option<Msg> {
        if let Some(modal) = self.modal_area {
            if !point_in_rect(x, y, modal) {
                return None;
            }
        }

        self.click_handlers
            .iter()
            .rev()
            .find(|(rect, _)| point_in_rect(x, y, *rect))
            .map(|(_, msg)| msg.clone())
    }

    pub fn len(&self) -> usize {
        self.click_handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.click_handlers.is_empty()
    }

    pub fn clear(&mut self) {
        self.click_handlers.clear();
        self.modal_area = None;
    }
}

fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}
