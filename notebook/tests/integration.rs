use pretty_assertions::assert_eq;

use nobook::{EncoderConfig, NamePolicy};
use notebook::{CellKind, Converter, Notebook, NotebookCell, Rename};

fn to_notebook(source: &str) -> Notebook {
    Converter::default().to_notebook(source, 0).0
}

fn to_source(notebook: &Notebook) -> String {
    Converter::default().to_source(notebook)
}

fn round_trip(source: &str) -> String {
    to_source(&to_notebook(source))
}

#[test]
fn single_block() {
    let nb = to_notebook("# @block=main\nprint(1)\n");
    assert_eq!(nb.cells.len(), 1);
    assert_eq!(nb.cells[0].kind, CellKind::Code);
    assert_eq!(nb.cells[0].source, "print(1)");
    assert_eq!(nb.cells[0].block_name(), Some("main"));
    assert_eq!(nb.cells[0].id.as_deref(), Some("main"));
    assert!(nb.metadata.nobook);
}

#[test]
fn multiple_blocks() {
    let nb = to_notebook("# @block=a\nx = 1\n# @block=b\ny = 2\n");
    assert_eq!(nb.block_names(), vec!["a", "b"]);
}

#[test]
fn preamble_becomes_raw_cell() {
    let nb = to_notebook("import os\n# @block=main\nprint(1)\n");
    assert_eq!(nb.cells.len(), 2);
    assert_eq!(nb.cells[0].kind, CellKind::Raw);
    assert!(nb.cells[0].is_preamble());
    assert_eq!(nb.cells[0].source, "import os");
    assert_eq!(nb.cells[1].kind, CellKind::Code);
}

#[test]
fn blank_preamble_is_dropped() {
    let nb = to_notebook("\n  \n# @block=main\nx\n");
    assert_eq!(nb.cells.len(), 1);
}

#[test]
fn duplicate_names_are_renamed_with_warning() {
    let (nb, warnings) = Converter::default().to_notebook("# @block=a\nx = 1\n# @block=a\ny = 2\n", 0);
    assert_eq!(nb.block_names(), vec!["a", "a-1"]);
    assert_eq!(warnings.len(), 1);
}

#[test]
fn empty_block_and_empty_text() {
    let nb = to_notebook("# @block=main\n# @block=next\ncode\n");
    assert_eq!(nb.cells[0].source, "");
    assert_eq!(nb.cells[1].source, "code");
    assert!(to_notebook("").cells.is_empty());
}

#[test]
fn notebook_to_source() {
    let nb = Notebook::new(vec![
        NotebookCell::preamble("import os"),
        NotebookCell::code("a", "x = 1"),
        NotebookCell::code("b", "y = 2"),
    ]);
    assert_eq!(to_source(&nb), "import os\n# @block=a\nx = 1\n# @block=b\ny = 2\n");
}

#[test]
fn duplicate_metadata_names_fixed_on_save() {
    let nb = Notebook::new(vec![
        NotebookCell::code("dupe", "x = 1"),
        NotebookCell::code("dupe", "y = 2"),
    ]);
    assert_eq!(to_source(&nb), "# @block=dupe\nx = 1\n# @block=dupe-1\ny = 2\n");
}

#[test]
fn new_cells_get_positional_names() {
    let nb = Notebook::new(vec![
        NotebookCell::unnamed_code("x = 1"),
        NotebookCell::unnamed_code("y = 2"),
    ]);
    let text = to_source(&nb);
    assert!(text.contains("# @block=cell-0\n"));
    assert!(text.contains("# @block=cell-1\n"));
}

#[test]
fn markdown_cells_are_dropped() {
    let mut notes = NotebookCell::unnamed_code("# Notes");
    notes.kind = CellKind::Markdown;
    let nb = Notebook::new(vec![notes, NotebookCell::code("a", "x")]);
    assert_eq!(to_source(&nb), "# @block=a\nx\n");
}

#[test]
fn round_trips() {
    let sources = [
        "# @block=main\nprint(1)\n",
        "# @block=setup\nx = 1\n# @block=run\nprint(x)\n# @block=done\npass\n",
        "import os\n# @block=main\nprint(1)\n",
        "# @block=a\n# @block=b\ncode\n",
        "# @block=a\nx = 1\n\n# @block=b\ny\n",
    ];
    for source in sources {
        assert_eq!(round_trip(source), source);
    }
}

#[test]
fn renamed_duplicates_round_trip() {
    let fixed = round_trip("# @block=x\na\n# @block=x\nb\n");
    assert_eq!(fixed, "# @block=x\na\n# @block=x-1\nb\n");
    assert_eq!(round_trip(&fixed), fixed);
}

#[test]
fn ensure_unique_reports_renames() {
    let mut nb = Notebook::new(vec![
        NotebookCell::preamble("import os"),
        NotebookCell::code("a", "1"),
        NotebookCell::unnamed_code("2"),
        NotebookCell::code("a", "3"),
    ]);
    let renames = Converter::default().ensure_unique_block_names(&mut nb);
    assert_eq!(
        renames,
        vec![
            Rename { index: 2, from: None, to: "cell-2".to_string() },
            Rename { index: 3, from: Some("a".to_string()), to: "a-1".to_string() },
        ]
    );
    assert_eq!(nb.block_names(), vec!["a", "cell-2", "a-1"]);
    assert!(Converter::default().ensure_unique_block_names(&mut nb).is_empty());
}

#[test]
fn copy_suffix_policy() {
    let converter = Converter::new(EncoderConfig {
        policy: NamePolicy::CopySuffix,
        ..EncoderConfig::default()
    });
    let mut nb = Notebook::new(vec![
        NotebookCell::code("a", "1"),
        NotebookCell::code("a", "2"),
        NotebookCell::code("a", "3"),
    ]);
    converter.ensure_unique_block_names(&mut nb);
    assert_eq!(nb.block_names(), vec!["a", "a-copy", "a-copy-1"]);
}

#[test]
fn json_round_trip() {
    let nb = to_notebook("import os\n# @block=main\nprint(1)\n");
    let json = nb.to_json().unwrap();
    assert!(json.contains("\"cell_type\": \"raw\""));
    assert!(json.contains("\"block\": \"main\""));
    assert_eq!(Notebook::from_json(&json).unwrap(), nb);
}

#[test]
fn reads_host_json() {
    let json = r#"{
        "metadata": {"kernelspec": {"name": "python3"}},
        "nbformat": 4,
        "nbformat_minor": 5,
        "cells": [
            {
                "cell_type": "code",
                "source": ["x = 1\n", "y = 2"],
                "metadata": {"nobook": {"block": "setup"}, "collapsed": false},
                "outputs": [],
                "execution_count": null
            },
            {"cell_type": "code", "source": "print(x)", "metadata": {}}
        ]
    }"#;
    let nb = Notebook::from_json(json).unwrap();
    assert_eq!(nb.cells[0].source, "x = 1\ny = 2");
    assert!(nb.cells[0].extra.contains_key("outputs"));
    assert!(nb.cells[0].metadata.extra.contains_key("collapsed"));
    assert!(nb.metadata.extra.contains_key("kernelspec"));
    assert_eq!(
        to_source(&nb),
        "# @block=setup\nx = 1\ny = 2\n# @block=cell-1\nprint(x)\n"
    );
}

#[test]
fn rejects_invalid_json() {
    assert!(Notebook::from_json("{\"cells\": 3}").is_err());
}

#[test]
fn whitespace_in_metadata_names_is_fixed_on_save() {
    let nb = Notebook::new(vec![
        NotebookCell::code("a", "x = 1"),
        NotebookCell::code("a ", "y = 2"),
        NotebookCell::code("my step", "z = 3"),
    ]);
    let text = to_source(&nb);
    assert_eq!(
        text,
        "# @block=a\nx = 1\n# @block=a-1\ny = 2\n# @block=cell-2\nz = 3\n"
    );
    assert_eq!(nobook::decode(&text).unwrap().blocks.len(), 3);
}

#[test]
fn trimmed_name_is_reported_as_rename() {
    let mut nb = Notebook::new(vec![NotebookCell::code(" setup ", "x = 1")]);
    let renames = Converter::default().ensure_unique_block_names(&mut nb);
    assert_eq!(
        renames,
        vec![Rename { index: 0, from: Some(" setup ".to_string()), to: "setup".to_string() }]
    );
    assert_eq!(nb.block_names(), vec!["setup"]);
}

#[test]
fn cell_id_follows_rename() {
    let mut unnamed = NotebookCell::unnamed_code("z = 3");
    unnamed.id = Some("host-id".to_string());
    let mut nb = Notebook::new(vec![
        NotebookCell::code("a", "x = 1"),
        NotebookCell::code("a", "y = 2"),
        unnamed,
    ]);
    Converter::default().ensure_unique_block_names(&mut nb);
    assert_eq!(nb.cells[0].id.as_deref(), Some("a"));
    assert_eq!(nb.cells[1].id.as_deref(), Some("a-1"));
    assert_eq!(nb.cells[2].id.as_deref(), Some("host-id"));
    assert_eq!(nb.cells[2].block_name(), Some("cell-2"));
}
