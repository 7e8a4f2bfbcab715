use nipzip::HuffmanCodec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sample_text = "Hello, world! This is a sample text for Huffman compression. \
                      The quick brown fox jumps over the lazy dog. \
                      Huffman encoding is a greedy algorithm that builds optimal prefix codes.";

    println!("Sample text: {} bytes", sample_text.len());

    let codec = HuffmanCodec::new(sample_text)?;
    print!("{}", codec.tree());
    println!("Character mode: {}", codec.mode());
    for (symbol, code) in codec.code_table().iter() {
        println!("  {symbol:?}: {code}");
    }

    let packed = codec.encode(sample_text)?;
    let ratio = packed.len() as f64 / sample_text.len() as f64;
    println!(
        "Compressed to: {} bytes ({:.1}% of original)",
        packed.len(),
        ratio * 100.0
    );

    let unpacked = nipzip::decompress(&packed)?;
    if unpacked != sample_text {
        return Err("Decompression verification failed".into());
    }
    println!("Decompression successful, data matches exactly.");

    Ok(())
}
