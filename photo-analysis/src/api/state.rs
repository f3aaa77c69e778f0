use crate::processing::PhotoPipeline;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: PhotoPipeline,
    pub ocr_available: bool,
}

impl AppState {
    pub fn new(pipeline: PhotoPipeline, ocr_available: bool) -> Self {
        Self {
            pipeline,
            ocr_available,
        }
    }
}
