#![no_main]

use libfuzzer_sys::fuzz_target;
use spark_codec_http::{ParseOptions, StatusCodePolicy, parse_message_with};
use spark_http_fuzz::{MessageSpec, check_roundtrip};

// 生成的字节必定合法：拒绝即为解析器缺陷，而非输入问题。
fuzz_target!(|spec: MessageSpec| {
    let wire = spec.render();
    let options = ParseOptions::with_status_codes(StatusCodePolicy::AnyThreeDigit);
    if let Err(violation) = parse_message_with(&wire, &options) {
        panic!("语法合法的报文被拒绝: {violation}; spec = {spec:?}");
    }
    check_roundtrip(&wire);
});
