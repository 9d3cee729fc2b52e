use contentx::{
    ByteView, Content, ContentFactory, Error, OwnedBlock, PlatformBuffer, SerializedContent,
    SourceKind,
};

const TEXT: &str = "てすとabc";
const URL: &str = "data:text/plain;base64,44Gm44GZ44GoYWJj";
const UTF8: [u8; 12] = [0xe3, 0x81, 0xa6, 0xe3, 0x81, 0x99, 0xe3, 0x81, 0xa8, 0x61, 0x62, 0x63];

#[derive(Debug, Clone, Copy)]
enum Shape {
    Plain,
    Url,
    Block,
    View,
    Platform,
}

const SHAPES: [Shape; 5] = [Shape::Plain, Shape::Url, Shape::Block, Shape::View, Shape::Platform];

fn factory() -> ContentFactory {
    let _ = env_logger::builder().is_test(true).try_init();
    ContentFactory::builder().with_bytes_platform().build()
}

fn build(factory: &ContentFactory, shape: Shape) -> Content {
    match shape {
        Shape::Plain => factory.plain_text(TEXT),
        Shape::Url => factory.url(URL),
        Shape::Block => factory.bin(OwnedBlock::new(UTF8.to_vec()), "text/plain").unwrap(),
        Shape::View => {
            // A view into the middle of a larger allocation.
            let mut padded = vec![0xffu8; 3];
            padded.extend_from_slice(&UTF8);
            padded.extend_from_slice(&[0xff; 2]);
            let view = ByteView::from(padded).subview(3..3 + UTF8.len());
            factory.bin(view, "text/plain").unwrap()
        }
        Shape::Platform => {
            let buffer = PlatformBuffer::new(&contentx::BytesPlatform, ByteView::from(UTF8.to_vec()));
            factory.bin(buffer, "text/plain").unwrap()
        }
    }
}

fn check(content: &Content, shape: Shape) {
    match shape {
        Shape::Plain => assert_eq!(content.to_plain_text().unwrap(), TEXT),
        Shape::Url => assert_eq!(content.to_url().unwrap(), URL),
        Shape::Block => assert_eq!(content.to_owned_block().unwrap().as_slice(), &UTF8),
        Shape::View => assert_eq!(content.to_bytes_view().unwrap().as_slice(), &UTF8),
        Shape::Platform => {
            let buffer = content.to_platform_buffer().unwrap();
            assert_eq!(buffer.as_slice(), &UTF8);
            assert_eq!(buffer.as_native().as_ref(), &UTF8);
        }
    }
}

#[test]
fn every_origin_reaches_every_target() {
    let factory = factory();
    for from in SHAPES {
        for to in SHAPES {
            let content = build(&factory, from);
            check(&content, to);
            // Second call answers from the cache with the same value.
            check(&content, to);
        }
    }
}

#[test]
fn conversions_chain_in_any_order() {
    let factory = factory();
    for from in SHAPES {
        let content = build(&factory, from);
        for to in SHAPES.iter().rev() {
            check(&content, *to);
        }
        for to in SHAPES {
            check(&content, to);
        }
    }
}

#[test]
fn partial_view_is_never_exposed_as_its_backing_block() {
    let content = build(&factory(), Shape::View);
    let block = content.to_owned_block().unwrap();
    assert_eq!(block.len(), UTF8.len());
    assert!(!block.ptr_eq(content.to_bytes_view().unwrap().backing()));
}

#[test]
fn source_is_recoverable_after_conversions() {
    let factory = factory();
    let content = build(&factory, Shape::Url);
    check(&content, Shape::Plain);
    check(&content, Shape::Block);
    assert_eq!(content.source_kind(), SourceKind::Url);
    assert!(content.has_plain_text());
    assert!(content.has_owned_block());
}

#[test]
fn serialized_form_round_trips() {
    let factory = factory();
    for from in SHAPES {
        let content = build(&factory, from);
        let serialized: SerializedContent = content.serialize().unwrap();
        let json = serde_json::to_string(&serialized).unwrap();
        let restored = factory.from_json(&json).unwrap();
        assert_eq!(restored.to_plain_text().unwrap(), TEXT, "from {:?}", from);
        assert_eq!(restored.to_bytes_view().unwrap().as_slice(), &UTF8, "from {:?}", from);
    }
}

#[test]
fn compound_content_type_survives() {
    let content = Content::url("data:text/plain;charset=utf8;base64,QUJD");
    assert_eq!(content.content_type(), Some("text/plain;charset=utf8"));
    assert_eq!(content.to_plain_text().unwrap(), "ABC");
}

#[test]
fn platform_buffer_needs_a_platform_to_stay_one() {
    let buffer = PlatformBuffer::new(&contentx::BytesPlatform, ByteView::from(UTF8.to_vec()));
    let content = Content::bin(buffer, "text/plain").unwrap();
    assert_eq!(content.source_kind(), SourceKind::BytesView);
    assert!(matches!(
        content.to_platform_buffer(),
        Err(Error::UnsupportedOperation(_))
    ));
    for shape in [Shape::Plain, Shape::Url, Shape::Block, Shape::View] {
        check(&content, shape);
    }
}
