//! Window view model and the presentation surface it is pushed to.

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Host-side handle of a portrait image.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct PortraitId(pub u16);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TitleView<'a> {
    pub name: &'a str,
    pub color: Rgb,
}

/// State of one optional visual slot of the window.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SlotView<T> {
    /// The window layout has no such element; nothing is touched.
    Absent,
    /// The element exists but the current paragraph has no speaker.
    Hidden,
    Shown(T),
}

/// View model consumed by the host renderer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DialogueView<'a> {
    pub title: SlotView<TitleView<'a>>,
    pub portrait: SlotView<PortraitId>,
    pub body: &'a str,
    /// 1-based paragraph number, `0` when nothing is showing.
    pub paragraph: u16,
    pub paragraph_total: u16,
    pub printed: bool,
}

/// Presentation surface of a dialogue window.
pub trait Presenter {
    fn set_title(&mut self, name: &str, color: Rgb);
    fn hide_title(&mut self);
    fn set_portrait(&mut self, portrait: PortraitId);
    fn hide_portrait(&mut self);
    fn set_body(&mut self, text: &str);
}

pub fn present_view<P: Presenter>(view: &DialogueView<'_>, presenter: &mut P) {
    match view.title {
        SlotView::Absent => {}
        SlotView::Hidden => presenter.hide_title(),
        SlotView::Shown(title) => presenter.set_title(title.name, title.color),
    }
    match view.portrait {
        SlotView::Absent => {}
        SlotView::Hidden => presenter.hide_portrait(),
        SlotView::Shown(portrait) => presenter.set_portrait(portrait),
    }
    presenter.set_body(view.body);
}
