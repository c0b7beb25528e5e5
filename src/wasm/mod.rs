//! WASM bindings for the paginator

mod flat_buffer;

pub use flat_buffer::{LayoutBuffer, F32_PER_PAGE, HEADER_SIZE, MAGIC, SCHEMA_VERSION};

use crate::document::{DocumentSnapshot, DocumentSource};
use crate::error::PaginationError;
use crate::layout::{PageGeometry, PaginationConfig};
use crate::PaginationSession;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// WASM-exposed pagination session
#[wasm_bindgen]
pub struct WasmPaginator {
    session: PaginationSession,
    buffer: LayoutBuffer,
}

#[wasm_bindgen]
impl WasmPaginator {
    /// Create a paginator with default page size (US Letter)
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        // 8.5" x 11" at 96 DPI, 1" margins
        Self::from_geometry(PageGeometry::with_margins(816.0, 1056.0, 96.0))
    }

    /// Create a paginator with custom page dimensions
    #[wasm_bindgen(js_name = withDimensions)]
    pub fn with_dimensions(
        page_width: f32,
        page_height: f32,
        margin_top: f32,
        margin_bottom: f32,
        margin_left: f32,
        margin_right: f32,
    ) -> Self {
        Self::from_geometry(PageGeometry {
            page_width,
            page_height,
            margin_top,
            margin_bottom,
            margin_left,
            margin_right,
        })
    }

    /// Replace pagination settings from a (possibly partial) JSON object
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, json: &str) -> Result<(), JsValue> {
        self.apply_config_json(json).map_err(to_js_error)
    }

    /// Replace the document from its JSON source form
    #[wasm_bindgen(js_name = setDocument)]
    pub fn set_document(&mut self, json: &str) -> Result<(), JsValue> {
        self.apply_document_json(json).map_err(to_js_error)
    }

    /// Replace the document with plain text, one paragraph per line
    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&mut self, text: &str) {
        self.session.set_text(text);
    }

    /// Run pagination if anything changed; returns the number of patched pages
    pub fn paginate(&mut self) -> Result<usize, JsValue> {
        self.refresh().map_err(to_js_error)
    }

    /// Integer half of the flat layout buffer
    #[wasm_bindgen(js_name = getU32Buffer)]
    pub fn get_u32_buffer(&self) -> js_sys::Uint32Array {
        js_sys::Uint32Array::from(self.buffer.u32_data.as_slice())
    }

    /// Float half of the flat layout buffer
    #[wasm_bindgen(js_name = getF32Buffer)]
    pub fn get_f32_buffer(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.buffer.f32_data.as_slice())
    }

    /// Full layout result as JSON, for debugging and tooling
    #[wasm_bindgen(js_name = getLayoutJson)]
    pub fn get_layout_json(&self) -> Result<String, JsValue> {
        self.layout_json().map_err(to_js_error)
    }

    /// Get page count
    #[wasm_bindgen(js_name = getPageCount)]
    pub fn get_page_count(&self) -> usize {
        self.session.page_count()
    }

    /// Whether the last accepted layout reached a fixed point
    #[wasm_bindgen(js_name = isConverged)]
    pub fn is_converged(&self) -> bool {
        self.session
            .layout()
            .is_some_and(|layout| layout.is_converged())
    }
}

impl WasmPaginator {
    fn from_geometry(geometry: PageGeometry) -> Self {
        Self {
            session: PaginationSession::new(geometry),
            buffer: LayoutBuffer::new(),
        }
    }

    fn apply_config_json(&mut self, json: &str) -> Result<(), serde_json::Error> {
        let config: PaginationConfig = serde_json::from_str(json)?;
        self.session.set_config(config);
        Ok(())
    }

    fn apply_document_json(&mut self, json: &str) -> Result<(), serde_json::Error> {
        let source: DocumentSource = serde_json::from_str(json)?;
        self.session.set_document(DocumentSnapshot::from(source));
        Ok(())
    }

    fn refresh(&mut self) -> Result<usize, PaginationError> {
        let Some(diff) = self.session.relayout()? else {
            return Ok(0);
        };
        if let Some(layout) = self.session.layout() {
            self.buffer
                .write(diff.version, layout, self.session.geometry());
        }
        Ok(diff.patch_count())
    }

    fn layout_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.session.layout())
    }

    /// The session behind the bindings
    pub fn session(&self) -> &PaginationSession {
        &self.session
    }

    /// Last encoded layout buffer
    pub fn buffer(&self) -> &LayoutBuffer {
        &self.buffer
    }
}

impl Default for WasmPaginator {
    fn default() -> Self {
        Self::new()
    }
}
