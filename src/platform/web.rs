//! Browser page backed by `web-sys`

use glam::DVec2;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlImageElement, Window};

use super::Page;
use crate::celebration::ConfettiPiece;
use crate::config::ElementIds;
use crate::error::WidgetError;
use crate::geometry::{Rect, Viewport};

/// Class toggled on Decline once it is fixed-positioned
const DODGING_CLASS: &str = "dodging";
const HIDDEN_CLASS: &str = "hidden";
const CONFETTI_CLASS: &str = "confetti-piece";

pub struct WebPage {
    window: Window,
    document: Document,
    card: HtmlElement,
    accept: HtmlElement,
    decline: HtmlElement,
    celebration: HtmlElement,
    confetti: HtmlElement,
    /// Preloaded images, kept alive until the page goes away
    preloads: Vec<HtmlImageElement>,
}

fn html_element(document: &Document, id: &str) -> Result<HtmlElement, WidgetError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| WidgetError::MissingElement(id.to_string()))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| WidgetError::WrongElementType(id.to_string()))
}

fn px(value: f64) -> String {
    format!("{}px", value)
}

impl WebPage {
    pub fn new(window: Window, ids: &ElementIds) -> Result<Self, WidgetError> {
        let document = window
            .document()
            .ok_or_else(|| WidgetError::Js("no document".into()))?;
        Ok(Self {
            card: html_element(&document, &ids.card)?,
            accept: html_element(&document, &ids.accept)?,
            decline: html_element(&document, &ids.decline)?,
            celebration: html_element(&document, &ids.celebration)?,
            confetti: html_element(&document, &ids.confetti)?,
            preloads: Vec::new(),
            document,
            window,
        })
    }

    pub fn accept_element(&self) -> &HtmlElement {
        &self.accept
    }

    pub fn decline_element(&self) -> &HtmlElement {
        &self.decline
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn place_decline(&self, at: DVec2) -> Result<(), WidgetError> {
        let style = self.decline.style();
        style.set_property("left", &px(at.x))?;
        style.set_property("top", &px(at.y))?;
        Ok(())
    }
}

impl Page for WebPage {
    fn decline_rect(&self) -> Rect {
        let rect = self.decline.get_bounding_client_rect();
        Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    fn viewport(&self) -> Viewport {
        let width = self.window.inner_width().ok().and_then(|v| v.as_f64());
        let height = self.window.inner_height().ok().and_then(|v| v.as_f64());
        // The root element tracks the layout viewport
        let root = || match self.document.document_element() {
            Some(root) => Viewport::new(root.client_width() as f64, root.client_height() as f64),
            None => Viewport::new(0.0, 0.0),
        };
        Viewport::from_reads(width, height, root).unwrap_or_else(|viewport| {
            log::warn!(
                "window.innerWidth/innerHeight unavailable, using {}x{}",
                viewport.width,
                viewport.height
            );
            viewport
        })
    }

    fn pin_decline(&mut self, at: DVec2) -> Result<(), WidgetError> {
        self.decline.class_list().add_1(DODGING_CLASS)?;
        self.place_decline(at)
    }

    fn move_decline(&mut self, to: DVec2) -> Result<(), WidgetError> {
        self.place_decline(to)
    }

    fn scale_accept(&mut self, scale: f64) -> Result<(), WidgetError> {
        self.accept
            .style()
            .set_property("transform", &format!("scale({})", scale))?;
        Ok(())
    }

    fn hide_decline(&mut self) -> Result<(), WidgetError> {
        self.decline.style().set_property("display", "none")?;
        Ok(())
    }

    fn hide_card(&mut self) -> Result<(), WidgetError> {
        self.card.class_list().add_1(HIDDEN_CLASS)?;
        Ok(())
    }

    fn show_celebration(&mut self) -> Result<(), WidgetError> {
        self.celebration.class_list().remove_1(HIDDEN_CLASS)?;
        Ok(())
    }

    fn spawn_confetti(&mut self, pieces: &[ConfettiPiece]) -> Result<(), WidgetError> {
        for piece in pieces {
            let el = self
                .document
                .create_element("div")?
                .dyn_into::<HtmlElement>()
                .map_err(|_| WidgetError::WrongElementType(CONFETTI_CLASS.into()))?;
            el.class_list().add_1(CONFETTI_CLASS)?;
            let style = el.style();
            for (name, value) in piece.style_properties() {
                style.set_property(name, &value)?;
            }
            self.confetti.append_child(&el)?;
        }
        Ok(())
    }

    fn clear_confetti(&mut self) -> Result<(), WidgetError> {
        self.confetti.set_inner_html("");
        Ok(())
    }

    fn preload(&mut self, url: &str) -> Result<(), WidgetError> {
        let image = HtmlImageElement::new()?;
        image.set_src(url);
        self.preloads.push(image);
        Ok(())
    }
}
