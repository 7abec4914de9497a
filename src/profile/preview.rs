use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::validation::PhotoUpload;

/// Local rendering of a selected photo, shown before any upload.
///
/// Lives only on the form; abandoning the form discards it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoPreview {
    pub file_name: String,
    pub data_url: String,
}

impl PhotoPreview {
    pub fn render(photo: &PhotoUpload) -> Self {
        Self {
            file_name: photo.file_name.clone(),
            data_url: format!(
                "data:{};base64,{}",
                photo.media_type,
                STANDARD.encode(&photo.bytes)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_data_url() {
        let photo = PhotoUpload::new("dot.png", "image/png", b"png".to_vec());
        let preview = PhotoPreview::render(&photo);
        assert_eq!(preview.file_name, "dot.png");
        assert_eq!(preview.data_url, "data:image/png;base64,cG5n");
    }
}
