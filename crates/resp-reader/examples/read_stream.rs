use resp_reader::ReadResult;
use resp_reader::Reader;

fn main() {
    println!("--- RESP reply stream example ---");

    // Simulate a TCP read path delivering replies in awkward fragments:
    // a status reply, a nil bulk, then a nested array, split mid-token.
    let chunks = vec![
        b"+O".as_slice(),
        b"K\r\n$-1\r\n*2\r\n:4".as_slice(),
        b"2\r\n*1\r\n$5\r\nhel".as_slice(),
        b"lo\r\n".as_slice(),
    ];

    let mut reader = Reader::new();

    for (i, chunk) in chunks.iter().enumerate() {
        println!(
            "\n[stream] received chunk {}: {:?}",
            i,
            String::from_utf8_lossy(chunk)
        );

        if let Err(error) = reader.feed(chunk) {
            eprintln!("[reader] terminal: {error}");
            return;
        }

        loop {
            match reader.get_reply() {
                ReadResult::Complete(value) => {
                    println!("[reader] complete: {value:?}");
                    // Keep draining; the chunk may hold more replies.
                }
                ReadResult::Incomplete => {
                    println!("[reader] incomplete, waiting for more data...");
                    break;
                }
                ReadResult::Error(error) => {
                    eprintln!("[reader] error: {error}");
                    return;
                }
            }
        }
    }
}
