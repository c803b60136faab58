use tracing::warn;

use crate::domain::{
    common::{ImageConfig, entities::app_errors::CoreError},
    image::entities::{ImageMediaType, NormalizedImage, RawImage},
};

/// Validates uploads and turns them into [`NormalizedImage`]s.
///
/// All images of a request are checked before anything is returned, so a
/// single bad file rejects the whole set.
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    max_file_size: usize,
    max_images: usize,
    allowed_types: Vec<ImageMediaType>,
}

impl ImageNormalizer {
    pub fn new(config: &ImageConfig) -> Self {
        let allowed_types = config
            .allowed_types
            .iter()
            .filter_map(|mime| {
                let media_type = ImageMediaType::from_mime(mime);
                if media_type.is_none() {
                    warn!("Ignoring unsupported image type in allow-list: {}", mime);
                }
                media_type
            })
            .collect();

        Self {
            max_file_size: config.max_file_size,
            max_images: config.max_images,
            allowed_types,
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    pub fn max_images(&self) -> usize {
        self.max_images
    }

    pub fn normalize(&self, images: Vec<RawImage>) -> Result<Vec<NormalizedImage>, CoreError> {
        if images.is_empty() {
            return Err(CoreError::Validation(
                "At least one image must be provided for analysis".to_string(),
            ));
        }

        if images.len() > self.max_images {
            return Err(CoreError::Validation(format!(
                "Maximum {} images allowed, got {}",
                self.max_images,
                images.len()
            )));
        }

        images
            .into_iter()
            .enumerate()
            .map(|(index, image)| self.normalize_one(index, image))
            .collect()
    }

    fn normalize_one(&self, index: usize, image: RawImage) -> Result<NormalizedImage, CoreError> {
        let filename = image
            .filename
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("image_{}", index));

        if image.data.is_empty() {
            return Err(CoreError::Validation(format!(
                "Image {} ({}) is empty",
                index, filename
            )));
        }

        if image.data.len() > self.max_file_size {
            return Err(CoreError::Validation(format!(
                "File size {} bytes exceeds maximum allowed size {} bytes ({})",
                image.data.len(),
                self.max_file_size,
                filename
            )));
        }

        let declared = image.content_type.as_deref().unwrap_or_default();
        match ImageMediaType::from_mime(declared) {
            Some(media_type) if self.allowed_types.contains(&media_type) => {}
            _ => {
                return Err(CoreError::Validation(format!(
                    "File type {} is not allowed ({})",
                    if declared.is_empty() { "unknown" } else { declared },
                    filename
                )));
            }
        }

        let media_type = ImageMediaType::sniff(&image.data)
            .filter(|detected| self.allowed_types.contains(detected))
            .ok_or_else(|| {
                CoreError::Validation(format!("File {} is not a valid image", filename))
            })?;

        Ok(NormalizedImage::from_bytes(filename, media_type, &image.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];
    const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 16, b'J', b'F', b'I', b'F'];

    fn normalizer(max_file_size: usize) -> ImageNormalizer {
        ImageNormalizer::new(&ImageConfig {
            max_file_size,
            max_images: 3,
            allowed_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
        })
    }

    fn raw(content_type: &str, data: &[u8]) -> RawImage {
        RawImage::new(
            Some("label.bin".to_string()),
            Some(content_type.to_string()),
            data.to_vec(),
        )
    }

    #[test]
    fn normalizes_valid_images_in_order() {
        let images = normalizer(1024)
            .normalize(vec![raw("image/png", PNG_BYTES), raw("image/jpeg", JPEG_BYTES)])
            .unwrap();

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].media_type, ImageMediaType::Png);
        assert_eq!(images[1].media_type, ImageMediaType::Jpeg);
        assert_eq!(images[0].size_bytes, PNG_BYTES.len());
        assert!(images[1].data_url().starts_with("data:image/jpeg;base64,/9j/"));
    }

    #[test]
    fn rejects_oversized_image() {
        let mut data = PNG_BYTES.to_vec();
        data.resize(2048, 0);

        let err = normalizer(1024)
            .normalize(vec![raw("image/png", &data)])
            .unwrap_err();

        assert!(matches!(err, CoreError::Validation(msg) if msg.contains("exceeds")));
    }

    #[test]
    fn rejects_type_outside_allow_list() {
        let err = normalizer(1024)
            .normalize(vec![raw("text/plain", b"This is not an image")])
            .unwrap_err();

        assert!(matches!(err, CoreError::Validation(msg) if msg.contains("text/plain")));
    }

    #[test]
    fn rejects_bytes_that_are_not_an_image() {
        let err = normalizer(1024)
            .normalize(vec![raw("image/jpeg", b"not really a jpeg")])
            .unwrap_err();

        assert!(matches!(err, CoreError::Validation(msg) if msg.contains("not a valid image")));
    }

    #[test]
    fn one_bad_image_rejects_the_whole_set() {
        let result = normalizer(1024).normalize(vec![
            raw("image/png", PNG_BYTES),
            raw("image/gif", b"GIF89a"),
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn rejects_empty_request() {
        assert!(matches!(
            normalizer(1024).normalize(vec![]),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn rejects_more_images_than_allowed() {
        let images = vec![raw("image/png", PNG_BYTES); 4];

        let err = normalizer(1024).normalize(images).unwrap_err();

        assert_eq!(
            err,
            CoreError::Validation("Maximum 3 images allowed, got 4".to_string())
        );
        assert_eq!(
            normalizer(1024)
                .normalize(vec![raw("image/png", PNG_BYTES); 3])
                .map(|images| images.len()),
            Ok(3)
        );
    }

    #[test]
    fn sniffs_webp_container() {
        let mut data = b"RIFF".to_vec();
        data.extend_from_slice(&[0x24, 0, 0, 0]);
        data.extend_from_slice(b"WEBPVP8 ");

        assert_eq!(ImageMediaType::sniff(&data), Some(ImageMediaType::Webp));
    }
}
