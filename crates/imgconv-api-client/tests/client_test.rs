use base64::Engine;
use imgconv_api_client::{
    endpoints, ApiClient, ConvertParams, CropParams, Fit, FlipDirection, ResizeParams,
    RotateParams,
};
use imgconv_core::{ApiError, ClientConfig};
use mockito::Matcher;
use serde_json::json;

const API_KEY: &str = "test-key";
const INPUT_BYTES: &[u8] = b"fake-jpeg-bytes";

fn client_for(server: &mockito::Server) -> ApiClient {
    let config = ClientConfig::new(API_KEY).with_base_url(server.url());
    ApiClient::new(&config).unwrap()
}

fn write_input(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("input.jpg");
    std::fs::write(&path, INPUT_BYTES).unwrap();
    path
}

fn encoded(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Plain-text multipart field. Values here are alphanumeric (or `-`), so no regex escaping.
fn field(name: &str, value: &str) -> Matcher {
    Matcher::Regex(format!(r#"name="{}"\r\n\r\n{}\r\n"#, name, value))
}

fn image_part() -> Matcher {
    Matcher::Regex(r#"name="image"; filename="input\.jpg"\r\nContent-Type: image/jpeg"#.to_string())
}

#[tokio::test]
async fn convert_writes_decoded_image() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", endpoints::CONVERT)
        .match_header("x-rapidapi-key", API_KEY)
        .match_header("x-rapidapi-host", "image-converter-api3.p.rapidapi.com")
        .match_body(Matcher::AllOf(vec![
            image_part(),
            field("format", "webp"),
            field("quality", "75"),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "success": true,
                "image": encoded(b"webp-output"),
                "data": {
                    "original": { "size": 2048 },
                    "converted": { "size": 1024 },
                    "compression": 50
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir);
    let output = dir.path().join("output.webp");

    let client = client_for(&server);
    let result = client
        .convert_image(&input, &output, &ConvertParams::new("webp").with_quality(75))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(std::fs::read(&output).unwrap(), b"webp-output");
    assert_eq!(result.bytes_written, b"webp-output".len());
    assert_eq!(result.output, output);
    let data = result.data.unwrap();
    assert_eq!(data.original.size, 2048);
    assert_eq!(data.converted.size, 1024);
    assert_eq!(data.compression, Some(50.0));
}

#[tokio::test]
async fn remote_failure_surfaces_message_and_leaves_output_untouched() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", endpoints::CONVERT)
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":false,"error":{"message":"Unsupported format: xyz"}}"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir);
    let output = dir.path().join("output.xyz");

    let err = client_for(&server)
        .convert_image(&input, &output, &ConvertParams::new("xyz"))
        .await
        .unwrap_err();

    mock.assert_async().await;
    match err.downcast_ref::<ApiError>() {
        Some(ApiError::Remote { status, message }) => {
            assert_eq!(*status, 400);
            assert_eq!(message, "Unsupported format: xyz");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!output.exists());
}

#[tokio::test]
async fn resize_sends_dimensions_and_fit() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", endpoints::RESIZE)
        .match_body(Matcher::AllOf(vec![
            image_part(),
            field("width", "800"),
            field("height", "600"),
            field("fit", "contain"),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "success": true,
                "image": encoded(b"resized"),
                "data": {
                    "original": { "width": 1920, "height": 1080 },
                    "resized": { "width": 800, "height": 600 }
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir);
    let output = dir.path().join("nested").join("resized.jpg");

    let params = ResizeParams::new(Some(800), Some(600)).with_fit(Fit::Contain);
    let result = client_for(&server)
        .resize_image(&input, &output, &params)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(std::fs::read(&output).unwrap(), b"resized");
    let data = result.data.unwrap();
    assert_eq!(data.original.describe().as_deref(), Some("1920x1080"));
    assert_eq!(data.resized.describe().as_deref(), Some("800x600"));
}

#[tokio::test]
async fn crop_rotate_and_flip_send_their_fields() {
    let mut server = mockito::Server::new_async().await;
    let body = json!({ "success": true, "image": encoded(b"out") }).to_string();

    let crop = server
        .mock("POST", endpoints::CROP)
        .match_body(Matcher::AllOf(vec![
            image_part(),
            field("left", "100"),
            field("top", "50"),
            field("width", "400"),
            field("height", "300"),
        ]))
        .with_body(&body)
        .create_async()
        .await;
    let rotate = server
        .mock("POST", endpoints::ROTATE)
        .match_body(Matcher::AllOf(vec![image_part(), field("angle", "-90")]))
        .with_body(&body)
        .create_async()
        .await;
    let flip = server
        .mock("POST", endpoints::FLIP)
        .match_body(Matcher::AllOf(vec![
            image_part(),
            field("direction", "vertical"),
        ]))
        .with_body(&body)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir);
    let client = client_for(&server);

    let cropped = dir.path().join("cropped.jpg");
    let crop_params = CropParams {
        left: 100,
        top: 50,
        width: 400,
        height: 300,
    };
    client.crop_image(&input, &cropped, &crop_params).await.unwrap();

    let rotated = dir.path().join("rotated.jpg");
    client
        .rotate_image(&input, &rotated, &RotateParams::new(-90))
        .await
        .unwrap();

    let flipped = dir.path().join("flipped.jpg");
    let result = client
        .flip_image(&input, &flipped, FlipDirection::Vertical)
        .await
        .unwrap();

    crop.assert_async().await;
    rotate.assert_async().await;
    flip.assert_async().await;
    for path in [&cropped, &rotated, &flipped] {
        assert_eq!(std::fs::read(path).unwrap(), b"out");
    }
    assert!(result.data.is_none());
}

#[tokio::test]
async fn list_formats_returns_entries() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", endpoints::FORMATS)
        .match_header("x-rapidapi-key", API_KEY)
        .with_body(
            json!({
                "success": true,
                "data": { "formats": [
                    { "format": "jpeg" },
                    { "format": "png" },
                    { "format": "webp", "quality": true }
                ]}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let formats = client_for(&server).list_formats().await.unwrap();

    mock.assert_async().await;
    let names: Vec<&str> = formats.iter().map(|f| f.format.as_str()).collect();
    assert_eq!(names, ["jpeg", "png", "webp"]);
    assert_eq!(formats[2].extra["quality"], true);
}

#[tokio::test]
async fn list_formats_without_data_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", endpoints::FORMATS)
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;

    let err = client_for(&server).list_formats().await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ApiError>(),
        Some(ApiError::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn gateway_error_is_status_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", endpoints::FORMATS)
        .with_status(503)
        .with_body("Service Unavailable")
        .create_async()
        .await;

    let err = client_for(&server).list_formats().await.unwrap_err();
    let api_err = err.downcast_ref::<ApiError>().unwrap();
    assert!(matches!(api_err, ApiError::Status { status: 503, .. }));
    assert!(api_err.is_retryable());
}

#[tokio::test]
async fn success_without_image_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", endpoints::ROTATE)
        .with_body(r#"{"success":true,"data":{}}"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir);
    let output = dir.path().join("rotated.jpg");

    let err = client_for(&server)
        .rotate_image(&input, &output, &RotateParams::new(90))
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ApiError>(),
        Some(ApiError::MalformedResponse(_))
    ));
    assert!(!output.exists());
}

#[tokio::test]
async fn invalid_base64_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", endpoints::FLIP)
        .with_body(r#"{"success":true,"image":"%%%not-base64%%%"}"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir);
    let output = dir.path().join("flipped.jpg");

    let err = client_for(&server)
        .flip_image(&input, &output, FlipDirection::Horizontal)
        .await
        .unwrap_err();

    assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::Decode(_))));
    assert!(!output.exists());
}

#[tokio::test]
async fn invalid_params_never_reach_the_service() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir);
    let output = dir.path().join("out.jpg");
    let client = client_for(&server);

    let err = client
        .resize_image(&input, &output, &ResizeParams::new(None, None))
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ApiError>(),
        Some(ApiError::InvalidInput(_))
    ));

    let err = client
        .convert_image(&input, &output, &ConvertParams::new("png").with_quality(0))
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ApiError>(),
        Some(ApiError::InvalidInput(_))
    ));

    mock.assert_async().await;
}

#[tokio::test]
async fn missing_input_file_fails_before_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = client_for(&server)
        .rotate_image(
            dir.path().join("missing.jpg"),
            dir.path().join("out.jpg"),
            &RotateParams::new(180),
        )
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Failed to read file"));
    mock.assert_async().await;
}
