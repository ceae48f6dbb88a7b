use std::io::{self, BufRead, BufReader, Read};

/// Splits a document on `\n`, dropping the `\r` of CRLF line endings.
pub fn split_lines(document: &str) -> impl Iterator<Item = &str> {
    document
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

pub fn read_document<R: Read>(reader: R) -> io::Result<String> {
    let mut reader = BufReader::new(reader);
    let mut document = String::new();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = reader.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        document.push_str(&buffer);
    }

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_carriage_returns() {
        let lines: Vec<&str> = split_lines("one\r\ntwo\n\r\nthree").collect();
        assert_eq!(lines, vec!["one", "two", "", "three"]);
    }

    #[test]
    fn reads_whole_document() {
        let document = read_document("# Title\n\nBody\n".as_bytes()).unwrap();
        assert_eq!(document, "# Title\n\nBody\n");
    }
}
