use super::*;

#[test]
fn encoded_bytes_carry_png_signature() {
    let canvas = Canvas::filled(12, 7, [1, 2, 3]).unwrap();
    let png = encode_png(&canvas).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn decode_preserves_dimensions_and_pixels() {
    let mut canvas = Canvas::filled(31, 9, [200, 210, 220]).unwrap();
    canvas.put_pixel(4, 5, [9, 8, 7, 255]);
    let back = decode_png(&encode_png(&canvas).unwrap()).unwrap();
    assert_eq!((back.width(), back.height()), (31, 9));
    assert_eq!(back, canvas);
}

#[test]
fn garbage_is_an_encode_error() {
    let err = decode_png(b"not a png").unwrap_err();
    assert!(matches!(err, GarbleError::Encode(_)));
}
