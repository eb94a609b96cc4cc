//! Inline product images and hosted image URLs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use url::Url;

use crate::error::MediaError;

/// Largest accepted decoded image, 5 MiB.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// A decoded `data:image/<type>;base64,<payload>` upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    data_uri: String,
    mime_type: String,
    size_bytes: usize,
}

impl ImageData {
    /// Parse and size-check a data URI.
    ///
    /// The payload is decoded to measure it; the original URI is kept as-is
    /// since image hosts accept data URIs directly.
    pub fn parse(data_uri: &str) -> Result<Self, MediaError> {
        let data_uri = data_uri.trim();
        let rest = data_uri
            .strip_prefix("data:")
            .ok_or_else(|| MediaError::InvalidImage("missing data: prefix".into()))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| MediaError::InvalidImage("missing payload".into()))?;
        let mime_type = meta
            .strip_suffix(";base64")
            .ok_or_else(|| MediaError::InvalidImage("payload is not base64".into()))?;
        match mime_type.strip_prefix("image/") {
            Some(subtype) if !subtype.is_empty() => {}
            _ => {
                return Err(MediaError::InvalidImage(format!(
                    "unsupported media type {mime_type:?}"
                )))
            }
        }

        let decoded = STANDARD
            .decode(payload)
            .map_err(|e| MediaError::InvalidImage(e.to_string()))?;
        if decoded.is_empty() {
            return Err(MediaError::InvalidImage("empty payload".into()));
        }
        if decoded.len() > MAX_IMAGE_BYTES {
            return Err(MediaError::ImageTooLarge {
                size: decoded.len(),
                max: MAX_IMAGE_BYTES,
            });
        }

        Ok(Self {
            data_uri: data_uri.to_string(),
            mime_type: mime_type.to_string(),
            size_bytes: decoded.len(),
        })
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    pub fn size_megabytes(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Public id of a hosted image: the last two path segments of its URL,
/// cut at the first `.`.
///
/// `https://res.cloudinary.com/demo/image/upload/v1/alura-geek/caneca.png`
/// gives `alura-geek/caneca`.
pub fn public_id_from_url(url: &str) -> Result<String, MediaError> {
    let invalid = || MediaError::InvalidUrl(url.to_string());
    let parsed = Url::parse(url).map_err(|_| invalid())?;
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    let [.., folder, file] = segments.as_slice() else {
        return Err(invalid());
    };
    let joined = format!("{folder}/{file}");
    let public_id = joined.split('.').next().unwrap_or_default();
    if public_id.is_empty() {
        return Err(invalid());
    }
    Ok(public_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn data_uri(mime: &str, bytes: &[u8]) -> String {
        format!("data:{mime};base64,{}", STANDARD.encode(bytes))
    }

    #[test]
    fn test_parse_png() {
        let image = ImageData::parse(&data_uri("image/png", &[137, 80, 78, 71])).unwrap();
        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(image.size_bytes(), 4);
        assert!(image.data_uri().starts_with("data:image/png;base64,"));
    }

    #[rstest]
    #[case("iVBORw0KGgo=")]
    #[case("data:text/plain;base64,aGVsbG8=")]
    #[case("data:image/png,plain")]
    #[case("data:image/png;base64,@@@")]
    #[case("data:image/;base64,aGVsbG8=")]
    #[case("data:image/png;base64,")]
    fn test_parse_rejects(#[case] input: &str) {
        assert!(matches!(
            ImageData::parse(input),
            Err(MediaError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_parse_size_limit() {
        let at_limit = vec![0_u8; MAX_IMAGE_BYTES];
        assert!(ImageData::parse(&data_uri("image/jpeg", &at_limit)).is_ok());

        let over = vec![0_u8; MAX_IMAGE_BYTES + 1];
        match ImageData::parse(&data_uri("image/jpeg", &over)) {
            Err(MediaError::ImageTooLarge { size, max }) => {
                assert_eq!(size, MAX_IMAGE_BYTES + 1);
                assert_eq!(max, MAX_IMAGE_BYTES);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_size_megabytes() {
        let image = ImageData::parse(&data_uri("image/webp", &vec![1_u8; 512 * 1024])).unwrap();
        assert!((image.size_megabytes() - 0.5).abs() < f64::EPSILON);
    }

    #[rstest]
    #[case(
        "https://res.cloudinary.com/demo/image/upload/v1712/alura-geek/caneca.png",
        "alura-geek/caneca"
    )]
    #[case(
        "https://res.cloudinary.com/demo/image/upload/v1712/alura-geek/caneca.png?x=1",
        "alura-geek/caneca"
    )]
    #[case("https://cdn.test/a/b.tar.gz", "a/b")]
    fn test_public_id_from_url(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(public_id_from_url(url).unwrap(), expected);
    }

    #[rstest]
    #[case("not a url")]
    #[case("https://cdn.test/only.png")]
    #[case("https://cdn.test/")]
    fn test_public_id_invalid(#[case] url: &str) {
        assert!(matches!(
            public_id_from_url(url),
            Err(MediaError::InvalidUrl(_))
        ));
    }
}
