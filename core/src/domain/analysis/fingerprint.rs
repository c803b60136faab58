use sha2::{Digest, Sha256};

use crate::domain::{
    analysis::entities::{AnalysisType, Fingerprint},
    image::NormalizedImage,
};

/// SHA-256 over the ordered images followed by the analysis type.
///
/// Each image is length-prefixed so that different splits of the same bytes
/// never collide. Image order is part of the key: the same photos uploaded in
/// a different order are a different request.
pub fn compute_fingerprint(images: &[NormalizedImage], analysis_type: AnalysisType) -> Fingerprint {
    let mut hasher = Sha256::new();

    for image in images {
        hasher.update((image.base64.len() as u64).to_be_bytes());
        hasher.update(image.base64.as_bytes());
    }
    hasher.update(b"|");
    hasher.update(analysis_type.as_str().as_bytes());

    Fingerprint::new(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::image::ImageMediaType;

    fn image(data: &[u8]) -> NormalizedImage {
        NormalizedImage::from_bytes("label.png".to_string(), ImageMediaType::Png, data)
    }

    #[test]
    fn same_images_yield_same_fingerprint() {
        let images = vec![image(b"front"), image(b"back")];

        let first = compute_fingerprint(&images, AnalysisType::Complete);
        let second = compute_fingerprint(&images.clone(), AnalysisType::Complete);

        assert_eq!(first, second);
        assert_eq!(first.as_str().len(), 64);
        assert!(first.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn reordering_images_changes_fingerprint() {
        let forward = compute_fingerprint(&[image(b"front"), image(b"back")], AnalysisType::Complete);
        let reversed = compute_fingerprint(&[image(b"back"), image(b"front")], AnalysisType::Complete);

        assert_ne!(forward, reversed);
    }

    #[test]
    fn single_byte_change_changes_fingerprint() {
        let original = compute_fingerprint(&[image(b"nutrition facts")], AnalysisType::Complete);
        let tampered = compute_fingerprint(&[image(b"nutrition fact$")], AnalysisType::Complete);

        assert_ne!(original, tampered);
    }

    #[test]
    fn analysis_type_is_part_of_the_key() {
        let images = [image(b"front")];

        assert_ne!(
            compute_fingerprint(&images, AnalysisType::Nutrition),
            compute_fingerprint(&images, AnalysisType::Ingredients)
        );
    }

    #[test]
    fn splitting_the_same_bytes_differently_does_not_collide() {
        let whole = compute_fingerprint(&[image(b"abcdef")], AnalysisType::Complete);
        let split = compute_fingerprint(&[image(b"abc"), image(b"def")], AnalysisType::Complete);

        assert_ne!(whole, split);
    }
}
