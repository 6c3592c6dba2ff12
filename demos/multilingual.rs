use markdown_chunker::Chunker;

fn main() {
    println!("=== Multilingual Chunking Examples ===\n");

    let japanese = r#"
# はじめに

Rustは、安全性、速度、並行性を重視したシステムプログラミング言語です。

## メモリ安全性

Rustの所有権システムは、ガベージコレクタを必要とせずにメモリ安全性を保証します。
これにより、パフォーマンスが重要なシステムプログラミングに最適です。

## 並行性

Rustの型システムは、コンパイル時にデータ競合を防ぎ、並行プログラミングをより安全で信頼性の高いものにします。

```rust
fn main() {
    println!("こんにちは、世界！");
}
```

## パフォーマンス

Rustはゼロコスト抽象化を提供し、使用しない機能に対して料金を支払う必要はありません。
コンパイルされたコードは、同等のCまたはC++コードと同じ速度で実行されます。
"#;

    let chinese = r#"
# 介绍

Rust是一种系统编程语言，专注于安全性、速度和并发性。

## 内存安全

Rust的所有权系统确保内存安全，无需垃圾收集器。
这使其成为性能至关重要的系统编程的理想选择。

```rust
fn main() {
    println!("你好，世界！");
}
```

## 性能

Rust提供零成本抽象，这意味着您不需要为不使用的功能付费。
"#;

    let korean = r#"
# 소개

Rust는 안전성, 속도 및 동시성에 중점을 둔 시스템 프로그래밍 언어입니다.

## 메모리 안전성

Rust의 소유권 시스템은 가비지 수집기 없이도 메모리 안전성을 보장합니다.

```rust
fn main() {
    println!("안녕하세요, 세계!");
}
```
"#;

    let chunker = Chunker::builder()
        .max_chunk_size(1200)
        .min_chunk_size(150)
        .build();

    println!("Japanese document");
    println!("{}", "=".repeat(60));
    let ja_result = chunker.chunk_result(japanese);
    print_language_stats("Japanese", &ja_result.chunks);

    println!("\nChinese document");
    println!("{}", "=".repeat(60));
    let zh_result = chunker.chunk_result(chinese);
    print_language_stats("Chinese", &zh_result.chunks);

    println!("\nKorean document");
    println!("{}", "=".repeat(60));
    let ko_result = chunker.chunk_result(korean);
    print_language_stats("Korean", &ko_result.chunks);

    let mixed = format!("{}\n\n{}\n\n{}", japanese, chinese, korean);
    println!("\nMixed multilingual document");
    println!("{}", "=".repeat(60));
    let mixed_result = chunker.chunk_result(&mixed);
    print_language_stats("Mixed", &mixed_result.chunks);

    println!("\n=== Detailed Japanese Chunks ===\n");
    for (i, chunk) in ja_result.chunks.iter().enumerate() {
        println!("Chunk #{}", i + 1);
        println!("  Content type: {}", chunk.metadata.content_type);
        println!("  Strategy: {}", chunk.metadata.strategy);
        println!("  Size (chars): {}", chunk.metadata.size);

        if !chunk.metadata.header_path.is_empty() {
            println!("  Headers: {:?}", chunk.metadata.header_path);
        }

        println!("  Preview: {}", chunk.metadata.preview);
        println!();
    }
}

fn print_language_stats(language: &str, chunks: &[markdown_chunker::Chunk]) {
    let total_chars: usize = chunks.iter().map(|c| c.metadata.size).sum();
    let avg_chars = if !chunks.is_empty() {
        total_chars / chunks.len()
    } else {
        0
    };

    println!("Language: {}", language);
    println!("  Chunks: {}", chunks.len());
    println!("  Total characters: {}", total_chars);
    println!("  Avg chars/chunk: {}", avg_chars);
}
