//! The marker rescale handler and its channel registration.

use std::{fs, path::PathBuf};

use crate::channel::{MethodCall, MethodChannel, MethodReply, Value};
use crate::image::{self, PngCompression, ScaleFilter};

/// Default name for the channel the handler is registered on.
pub const MARKER_CHANNEL: &str = "app/markers";

/// Method name the rescale handler answers to.
pub const SCALE_MARKER: &str = "scaleMarker";

/// Error code reported when any stage of the rescale fails.
pub const SCALE_ERROR_CODE: &str = "UNAVAILABLE";

/// Fixed message accompanying the error code. No structured detail is
/// sent back to the caller.
pub const SCALE_ERROR_MESSAGE: &str = "Failed to scale marker";

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScaleConfig {
    /// Substituted for `width`/`height` when the argument is missing or
    /// not a number.
    pub default_dimension: i32,
    pub filter: ScaleFilter,
    pub compression: PngCompression,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            default_dimension: 100,
            filter: ScaleFilter::Nearest,
            compression: PngCompression::Default,
        }
    }
}

impl ScaleConfig {
    pub fn load() -> Option<Self> {
        let config_path = Self::config_path()?;

        fs::read_to_string(&config_path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
    }

    pub fn save(&self) -> Option<()> {
        let config_path = Self::config_path()?;

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).ok()?;
        }

        serde_json::to_string_pretty(self)
            .ok()
            .and_then(|json| fs::write(&config_path, json).ok())
    }

    fn config_path() -> Option<PathBuf> {
        let home = std::env::home_dir()?;
        Some(home.join(".config").join("marker-scale").join("config.json"))
    }
}

/// Arguments of a single `scaleMarker` call, after default substitution.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleRequest {
    pub image: Vec<u8>,
    pub width: i32,
    pub height: i32,
}

impl ScaleRequest {
    /// Extract the request from a method call.
    ///
    /// A missing or non-binary `image` argument becomes an empty byte
    /// buffer, which later fails decode. `width`/`height` fall back to
    /// `default_dimension` unless they arrive as a number; fractional
    /// values are truncated. Nothing here checks that the result is
    /// positive.
    pub fn from_call(call: &MethodCall, default_dimension: i32) -> Self {
        let image = call
            .argument("image")
            .and_then(Value::as_bytes)
            .map(<[u8]>::to_vec)
            .unwrap_or_default();

        ScaleRequest {
            image,
            width: dimension_argument(call, "width", default_dimension),
            height: dimension_argument(call, "height", default_dimension),
        }
    }
}

fn dimension_argument(call: &MethodCall, name: &str, default: i32) -> i32 {
    call.argument(name)
        .and_then(Value::as_f64)
        .map(|d| d as i32)
        .unwrap_or(default)
}

/// Handle one `scaleMarker` call: decode, resample, re-encode.
///
/// Every failure along the pipeline collapses into the single
/// [`SCALE_ERROR_CODE`] reply; nothing propagates to the host as a panic.
pub fn scale_marker(call: &MethodCall, config: &ScaleConfig) -> MethodReply {
    let request = ScaleRequest::from_call(call, config.default_dimension);

    match image::rescale(&request.image, request.width, request.height, config) {
        Ok(bytes) => MethodReply::Success(Value::Bytes(bytes)),
        Err(e) => {
            log::warn!("Failed to scale marker image: {e:#}");
            MethodReply::error(SCALE_ERROR_CODE, SCALE_ERROR_MESSAGE)
        }
    }
}

/// Build the marker channel with the rescale handler registered.
pub fn marker_channel(config: ScaleConfig) -> MethodChannel {
    let mut channel = MethodChannel::new(MARKER_CHANNEL);
    channel.register(SCALE_MARKER, move |call| scale_marker(call, &config));
    channel
}

#[test]
fn scale_request_defaults_missing_arguments() {
    let call = MethodCall::new(SCALE_MARKER);
    let request = ScaleRequest::from_call(&call, 100);

    assert!(request.image.is_empty());
    assert_eq!(request.width, 100);
    assert_eq!(request.height, 100);
}

#[test]
fn scale_request_defaults_non_numeric_dimensions() {
    let call = MethodCall::new(SCALE_MARKER)
        .with_argument("width", "20")
        .with_argument("height", true);
    let request = ScaleRequest::from_call(&call, 100);

    assert_eq!(request.width, 100);
    assert_eq!(request.height, 100);
}

#[test]
fn scale_request_truncates_fractional_dimensions() {
    let call = MethodCall::new(SCALE_MARKER)
        .with_argument("width", 20.9)
        .with_argument("height", 5.1);
    let request = ScaleRequest::from_call(&call, 100);

    assert_eq!(request.width, 20);
    assert_eq!(request.height, 5);
}

#[test]
fn scale_marker_resizes_without_preserving_aspect_ratio() {
    use imageproc::image::GenericImageView;

    let channel = marker_channel(ScaleConfig::default());
    let call = MethodCall::new(SCALE_MARKER)
        .with_argument("image", crate::image::test_png(10, 10, [255, 0, 0, 255]))
        .with_argument("width", 20.0)
        .with_argument("height", 5.0);

    let bytes = match channel.dispatch(&call) {
        MethodReply::Success(Value::Bytes(bytes)) => bytes,
        reply => panic!("expected success reply, got {reply:?}"),
    };

    let img = imageproc::image::load_from_memory(&bytes).unwrap();
    assert_eq!(img.dimensions(), (20, 5));
    assert_eq!(img.to_rgba8().get_pixel(0, 0).0, [255, 0, 0, 255]);
}

#[test]
fn scale_marker_accepts_integer_dimensions() {
    use imageproc::image::GenericImageView;

    let channel = marker_channel(ScaleConfig::default());
    let call = MethodCall::new(SCALE_MARKER)
        .with_argument("image", crate::image::test_png(8, 8, [0, 255, 0, 255]))
        .with_argument("width", 4i64)
        .with_argument("height", 16i64);

    let bytes = match channel.dispatch(&call) {
        MethodReply::Success(Value::Bytes(bytes)) => bytes,
        reply => panic!("expected success reply, got {reply:?}"),
    };

    let img = imageproc::image::load_from_memory(&bytes).unwrap();
    assert_eq!(img.dimensions(), (4, 16));
}

#[test]
fn scale_marker_reports_unavailable_on_malformed_bytes() {
    let channel = marker_channel(ScaleConfig::default());
    let call = MethodCall::new(SCALE_MARKER).with_argument("image", vec![0u8, 1, 2, 3]);

    assert_eq!(
        channel.dispatch(&call),
        MethodReply::error(SCALE_ERROR_CODE, SCALE_ERROR_MESSAGE)
    );
}

#[test]
fn scale_marker_reports_unavailable_on_missing_image() {
    let channel = marker_channel(ScaleConfig::default());
    let call = MethodCall::new(SCALE_MARKER)
        .with_argument("width", 20.0)
        .with_argument("height", 20.0);

    assert_eq!(
        channel.dispatch(&call),
        MethodReply::error("UNAVAILABLE", "Failed to scale marker")
    );
}

#[test]
fn scale_marker_reports_unavailable_on_non_positive_dimensions() {
    let channel = marker_channel(ScaleConfig::default());
    let call = MethodCall::new(SCALE_MARKER)
        .with_argument("image", crate::image::test_png(4, 4, [0, 0, 255, 255]))
        .with_argument("width", 0.0)
        .with_argument("height", -5.0);

    assert_eq!(
        channel.dispatch(&call),
        MethodReply::error(SCALE_ERROR_CODE, SCALE_ERROR_MESSAGE)
    );
}

#[test]
fn unknown_method_on_marker_channel_is_not_implemented() {
    let channel = marker_channel(ScaleConfig::default());
    let call = MethodCall::new("tintMarker");

    assert_eq!(channel.dispatch(&call), MethodReply::NotImplemented);
}

#[test]
fn config_round_trips_through_json() {
    let config = ScaleConfig {
        default_dimension: 64,
        filter: ScaleFilter::Lanczos3,
        compression: PngCompression::Best,
    };

    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(serde_json::from_str::<ScaleConfig>(&json).unwrap(), config);
}
