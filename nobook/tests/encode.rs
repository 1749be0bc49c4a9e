use std::collections::HashSet;

use pretty_assertions::assert_eq;

use nobook::{Cell, Encoder, EncoderConfig, NamePolicy, UnnamedStyle, decode, encode};

#[test]
fn encodes_named_cells() {
    let cells = vec![Cell::named("a", "x = 1"), Cell::named("b", "y = 2\n")];
    assert_eq!(encode(&cells), "# @block=a\nx = 1\n# @block=b\ny = 2\n");
}

#[test]
fn empty_body_is_just_a_marker() {
    let cells = vec![Cell::named("a", ""), Cell::named("b", "code")];
    assert_eq!(encode(&cells), "# @block=a\n# @block=b\ncode\n");
}

#[test]
fn empty_cell_list() {
    assert_eq!(encode(&[]), "");
}

#[test]
fn unnamed_cells_get_indexed_names() {
    let cells = vec![Cell::unnamed("x = 1"), Cell::unnamed("y = 2")];
    assert_eq!(encode(&cells), "# @block=cell-0\nx = 1\n# @block=cell-1\ny = 2\n");
}

#[test]
fn empty_name_counts_as_unnamed() {
    let cells = vec![Cell::named("", "x")];
    assert_eq!(encode(&cells), "# @block=cell-0\nx\n");
}

#[test]
fn duplicates_are_renamed_apart() {
    let cells = vec![
        Cell::unnamed("a"),
        Cell::named("x", "b"),
        Cell::named("x", "c"),
    ];
    let text = encode(&cells);
    let doc = decode(&text).unwrap();
    let names: HashSet<&str> = doc.block_names().into_iter().collect();
    assert_eq!(names.len(), 3);
    assert_eq!(doc.blocks[1].name, "x");
    assert_ne!(doc.blocks[2].name, "x");
    assert_eq!(doc.blocks[2].name, "x-1");
}

#[test]
fn generated_name_collision_with_explicit_name() {
    let cells = vec![Cell::unnamed("a"), Cell::named("cell-0", "b")];
    let names = Encoder::default().resolve_names(&[None, Some("cell-0")]);
    assert_eq!(names, vec!["cell-0", "cell-0-1"]);
    assert!(encode(&cells).contains("# @block=cell-0-1\n"));
}

#[test]
fn configurable_prefix_and_policy() {
    let encoder = Encoder::new(EncoderConfig {
        prefix: "step".to_string(),
        unnamed: UnnamedStyle::Plain,
        policy: NamePolicy::CopySuffix,
    });
    let names = encoder.resolve_names(&[None, None, None, Some("step")]);
    assert_eq!(names, vec!["step", "step-copy", "step-copy-1", "step-copy-2"]);
}

#[test]
fn preamble_is_emitted_first() {
    let encoder = Encoder::default();
    let cells = vec![Cell::named("main", "print(1)")];
    assert_eq!(
        encoder.encode_with_preamble("import os", &cells),
        "import os\n# @block=main\nprint(1)\n"
    );
    assert_eq!(
        encoder.encode_with_preamble("", &cells),
        "# @block=main\nprint(1)\n"
    );
    assert_eq!(encoder.encode_with_preamble("x = 1\n", &[]), "x = 1\n");
}

#[test]
fn round_trip_is_byte_identical() {
    let sources = [
        "",
        "x=1\ny=2\n",
        "# @block=a\nprint(1)\n# @block=b\nprint(2)\n",
        "import os\n# @block=main\nprint(1)\n",
        "# @block=a\n# @block=b\ncode\n",
        "\n\n# @block=a\nx\n\n\n# @block=b\n\ny\n",
        "# @block=setup\nx = 1\n# @block=run\nprint(x)\n# @block=done\npass\n",
        "# @block=a\r\nx = 1\r\n",
    ];
    let encoder = Encoder::default();
    for src in sources {
        let doc = decode(src).unwrap();
        let expected = src.replace("# @block=a\r\n", "# @block=a\n");
        assert_eq!(encoder.encode_document(&doc), expected, "source: {:?}", src);
    }
}

#[test]
fn round_trip_canonicalizes_markers() {
    let doc = decode("#@block=a   \nx\n").unwrap();
    assert_eq!(Encoder::default().encode_document(&doc), "# @block=a\nx\n");
}

#[test]
fn missing_final_newline_is_normalized_once() {
    let doc = decode("# @block=a\nx").unwrap();
    let once = Encoder::default().encode_document(&doc);
    assert_eq!(once, "# @block=a\nx\n");
    let twice = Encoder::default().encode_document(&decode(&once).unwrap());
    assert_eq!(twice, once);
}

#[test]
fn decode_encode_decode_is_stable() {
    let src = "# @block=load\ndata = [1, 2]\n\n# @block=sum\ntotal = sum(data)\n# @block=show\nprint(total)\n";
    let first = decode(src).unwrap();
    let second = decode(&encode(&first.cells())).unwrap();
    assert_eq!(first.cells(), second.cells());
    assert_eq!(first.blocks, second.blocks);
}

#[test]
fn encode_decode_preserves_unique_names() {
    let cells = vec![
        Cell::named("setup", "x = 1\n"),
        Cell::named("run", "print(x)\n"),
        Cell::named("empty", ""),
    ];
    let doc = decode(&encode(&cells)).unwrap();
    assert_eq!(doc.cells(), cells);
}

#[test]
fn trailing_whitespace_in_name_is_trimmed() {
    let cells = vec![Cell::named("a", "x = 1"), Cell::named("a ", "y = 2")];
    let text = encode(&cells);
    assert_eq!(text, "# @block=a\nx = 1\n# @block=a-1\ny = 2\n");
    assert_eq!(decode(&text).unwrap().block_names(), vec!["a", "a-1"]);
}

#[test]
fn names_with_inner_whitespace_are_replaced() {
    let cells = vec![
        Cell::named("a", "x = 1"),
        Cell::named("my step", "y = 2"),
        Cell::named("two\nlines", "z = 3"),
        Cell::named("  ", "w = 4"),
    ];
    let doc = decode(&encode(&cells)).unwrap();
    assert_eq!(doc.block_names(), vec!["a", "cell-1", "cell-2", "cell-3"]);
}

#[test]
fn every_encoded_name_decodes_back() {
    let names = ["a", " a", "a\t", "b c", "", "\r", "a-1"];
    let cells: Vec<Cell> = names.iter().map(|n| Cell::named(*n, "pass")).collect();
    let doc = decode(&encode(&cells)).unwrap();
    assert_eq!(doc.blocks.len(), names.len());
}
