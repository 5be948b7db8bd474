//! Build script for minifying the embedded injection routine and stylesheet.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;
use std::fs;
use std::path::Path;

fn main() {
    let out_dir = std::env::var("OUT_DIR").unwrap();
    let out_path = Path::new(&out_dir);

    minify_js_file("src/embed/pdf/handler.js", &out_path.join("handler.min.js"));
    minify_css_file("src/embed/css/bionic.css", &out_path.join("bionic.min.css"));

    println!("cargo:rerun-if-changed=src/embed/pdf/handler.js");
    println!("cargo:rerun-if-changed=src/embed/css/bionic.css");
}

fn minify_js(source: &str) -> String {
    let allocator = Allocator::default();
    // The routine is evaluated as a classic script inside the viewer.
    let source_type = SourceType::cjs();

    let ret = Parser::new(&allocator, source, source_type).parse();
    assert!(ret.errors.is_empty(), "Parse errors: {:?}", ret.errors);

    let mut program = ret.program;
    // Top-level names stay intact: the template placeholders are identifiers
    // and string literals that must survive until render time.
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);

    Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code
}

fn minify_js_file(input: &str, output: &Path) {
    let source = fs::read_to_string(input).expect("Failed to read JS file");
    let code = minify_js(&source);
    fs::write(output, code).expect("Failed to write minified JS");
}

fn minify_css(source: &str) -> String {
    let stylesheet =
        StyleSheet::parse(source, ParserOptions::default()).expect("Failed to parse CSS");
    stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..Default::default()
        })
        .expect("Failed to minify CSS")
        .code
}

fn minify_css_file(input: &str, output: &Path) {
    let source = fs::read_to_string(input).expect("Failed to read CSS file");
    let code = minify_css(&source);
    fs::write(output, code).expect("Failed to write minified CSS");
}
