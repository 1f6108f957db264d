use super::*;

#[test]
fn basic_mapping_is_the_identity_for_every_line_and_column() {
    let content = "a: 1\nb: 2\nc: 3\n";
    let map = SourceMap::create_basic_mapping("pipeline.yaml", content, "pipeline.yaml");
    for line in 1..=3 {
        for col in [0, 4, 12] {
            let (orig_line, orig_col, file) = map.map_to_original(line, col).unwrap();
            assert_eq!(orig_line, line);
            assert_eq!(orig_col, col);
            assert_eq!(file, "pipeline.yaml");
        }
    }
}

#[test]
fn map_to_original_picks_greatest_runtime_line_not_exceeding_query() {
    let content = "one\ntwo\nthree\n";
    let map = SourceMap::create_basic_mapping("f.yaml", content, "f.yaml");
    let (line, _, _) = map.map_to_original(2, 0).unwrap();
    assert_eq!(line, 2);
}

#[test]
fn map_to_original_is_none_before_the_first_mapping() {
    let map = SourceMap::create_basic_mapping("f.yaml", "x\n", "f.yaml");
    assert!(map.map_to_original(0, 0).is_none());
}

#[test]
fn source_context_renders_a_caret_under_the_column() {
    let content = "stages:\n  - name: build\n    steps: []\n";
    let map = SourceMap::create_basic_mapping("f.yaml", content, "f.yaml");
    let rendered = map.source_context(2, 4, 1);
    assert!(rendered.contains("name: build"));
    assert!(rendered.contains('^'));
}

#[test]
fn source_context_out_of_range_line_is_empty() {
    let map = SourceMap::create_basic_mapping("f.yaml", "a\n", "f.yaml");
    assert_eq!(map.source_context(99, 0, 2), "");
}
