//! 回归测试：逐一重放 `roundtrip` 语料。
//!
//! - **Why**：CI 中运行常规 `cargo test` 即可验证 fuzz 语料，无需 libFuzzer 运行时。
//! - **How**：遍历语料目录，对每个样本调用 [`spark_http_fuzz::check_roundtrip`]，panic 即视为回归。

use std::fs;
use std::path::PathBuf;

#[test]
fn replay_roundtrip_corpus() {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.push("corpus/roundtrip");
    let entries = fs::read_dir(&dir).expect("roundtrip corpus 应存在");
    let mut replayed = 0;
    for entry in entries {
        let entry = entry.expect("读取语料目录失败");
        if !entry.file_type().map(|kind| kind.is_file()).unwrap_or(false) {
            continue;
        }
        let data = fs::read(entry.path()).expect("读取语料失败");
        spark_http_fuzz::check_roundtrip(&data);
        replayed += 1;
    }
    assert!(replayed > 0, "语料目录不应为空");
}
