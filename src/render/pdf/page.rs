//! Page canvas and top-to-bottom flow with per-page decorations.

use lopdf::content::Operation;
use lopdf::{Object, StringFormat};

use super::metrics::{Font, encode_win_ansi};

/// Points per millimetre.
pub(crate) const MM: f32 = 72.0 / 25.4;

/// Page size and margins in points.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Geometry {
    pub width: f32,
    pub height: f32,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Geometry {
    /// A4 portrait with the invoice margins.
    pub(crate) fn a4() -> Self {
        Self {
            width: 595.2756,
            height: 841.8898,
            left: 18.0 * MM,
            right: 18.0 * MM,
            top: 16.0 * MM,
            bottom: 20.0 * MM,
        }
    }

    pub(crate) fn content_width(&self) -> f32 {
        self.width - self.left - self.right
    }

    /// Right edge of the content area.
    pub(crate) fn content_right(&self) -> f32 {
        self.width - self.right
    }

    /// Highest y where content may start.
    pub(crate) fn content_top(&self) -> f32 {
        self.height - self.top
    }

    /// Vertical space between the top and bottom margins.
    pub(crate) fn content_height(&self) -> f32 {
        self.content_top() - self.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub(crate) const fn hex(value: u32) -> Self {
        Self(
            ((value >> 16) & 0xFF) as f32 / 255.0,
            ((value >> 8) & 0xFF) as f32 / 255.0,
            (value & 0xFF) as f32 / 255.0,
        )
    }

    fn operands(&self) -> Vec<Object> {
        vec![self.0.into(), self.1.into(), self.2.into()]
    }
}

/// Drawing operations of one physical page.
#[derive(Debug, Default)]
pub(crate) struct Canvas {
    ops: Vec<Operation>,
}

impl Canvas {
    pub(crate) fn into_operations(self) -> Vec<Operation> {
        self.ops
    }

    /// Draw text with its baseline at `y`, starting at `x`.
    pub(crate) fn text(&mut self, x: f32, y: f32, font: Font, size: f32, color: Rgb, text: &str) {
        if text.is_empty() {
            return;
        }
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new("rg", color.operands()));
        self.ops.push(Operation::new(
            "Tf",
            vec![font.resource().into(), size.into()],
        ));
        self.ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
        ));
        self.ops.push(Operation::new("ET", vec![]));
    }

    /// Draw text ending at `right`.
    pub(crate) fn text_right(&mut self, right: f32, y: f32, font: Font, size: f32, color: Rgb, text: &str) {
        let x = right - font.text_width(text, size);
        self.text(x, y, font, size, color, text);
    }

    /// Draw text centered on `center`.
    pub(crate) fn text_centered(&mut self, center: f32, y: f32, font: Font, size: f32, color: Rgb, text: &str) {
        let x = center - font.text_width(text, size) / 2.0;
        self.text(x, y, font, size, color, text);
    }

    pub(crate) fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb) {
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new("RG", color.operands()));
        self.ops.push(Operation::new("w", vec![width.into()]));
        self.ops.push(Operation::new("m", vec![from.0.into(), from.1.into()]));
        self.ops.push(Operation::new("l", vec![to.0.into(), to.1.into()]));
        self.ops.push(Operation::new("S", vec![]));
        self.ops.push(Operation::new("Q", vec![]));
    }

    /// Fill a rectangle whose lower-left corner is `(x, y)`.
    pub(crate) fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new("rg", color.operands()));
        self.ops.push(Operation::new(
            "re",
            vec![x.into(), y.into(), width.into(), height.into()],
        ));
        self.ops.push(Operation::new("f", vec![]));
        self.ops.push(Operation::new("Q", vec![]));
    }

    /// Paint an image XObject into the box with lower-left corner `(x, y)`.
    pub(crate) fn image(&mut self, name: &str, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new(
            "cm",
            vec![
                width.into(),
                Object::Integer(0),
                Object::Integer(0),
                height.into(),
                x.into(),
                y.into(),
            ],
        ));
        self.ops.push(Operation::new("Do", vec![name.into()]));
        self.ops.push(Operation::new("Q", vec![]));
    }
}

/// Decoration drawn once on every physical page.
pub(crate) type PageDecoration<'a> = Box<dyn Fn(&mut Canvas) + 'a>;

/// Flows content down the page and opens new pages as needed.
///
/// Decorations are not part of the flow: a registered callback is invoked
/// once when each page is closed, so it can draw at fixed positions
/// regardless of how much content the page holds.
pub(crate) struct PageWriter<'a> {
    geometry: Geometry,
    finished: Vec<Canvas>,
    current: Canvas,
    cursor: f32,
    decoration: Option<PageDecoration<'a>>,
}

impl<'a> PageWriter<'a> {
    pub(crate) fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            finished: Vec::new(),
            current: Canvas::default(),
            cursor: geometry.content_top(),
            decoration: None,
        }
    }

    /// Register the per-page decoration callback.
    pub(crate) fn on_page(mut self, decoration: impl Fn(&mut Canvas) + 'a) -> Self {
        self.decoration = Some(Box::new(decoration));
        self
    }

    pub(crate) fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Current top of free space.
    pub(crate) fn cursor(&self) -> f32 {
        self.cursor
    }

    /// 1-based number of the page being filled.
    pub(crate) fn page_number(&self) -> usize {
        self.finished.len() + 1
    }

    pub(crate) fn canvas(&mut self) -> &mut Canvas {
        &mut self.current
    }

    /// Move the cursor down.
    pub(crate) fn advance(&mut self, dy: f32) {
        self.cursor -= dy;
    }

    /// Whether nothing has been placed on the current page yet.
    pub(crate) fn at_page_top(&self) -> bool {
        self.cursor >= self.geometry.content_top()
    }

    /// Start a new page unless `height` still fits above the bottom margin.
    /// Returns true when a page break happened.
    pub(crate) fn ensure(&mut self, height: f32) -> bool {
        if self.cursor - height >= self.geometry.bottom || self.at_page_top() {
            return false;
        }
        self.break_page();
        true
    }

    pub(crate) fn break_page(&mut self) {
        let mut page = std::mem::take(&mut self.current);
        self.decorate(&mut page);
        self.finished.push(page);
        self.cursor = self.geometry.content_top();
    }

    /// Close the last page and return all pages in order.
    pub(crate) fn finish(mut self) -> Vec<Canvas> {
        let mut last = std::mem::take(&mut self.current);
        self.decorate(&mut last);
        self.finished.push(last);
        self.finished
    }

    fn decorate(&self, page: &mut Canvas) {
        if let Some(decoration) = &self.decoration {
            decoration(page);
        }
    }
}
