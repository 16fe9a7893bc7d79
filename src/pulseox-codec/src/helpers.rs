type Result<T> = std::result::Result<T, ShortBufferError>;

#[derive(Debug)]
pub struct ShortBufferError;

/// Cursor over a byte buffer; every read consumes from the front.
pub trait BufferReader {
    fn read<const N: usize>(&mut self) -> Result<[u8; N]>;

    fn read_u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read()?))
    }
}

impl BufferReader for &[u8] {
    fn read<const N: usize>(&mut self) -> Result<[u8; N]> {
        let data: &[u8] = *self;
        let Some((head, tail)) = data.split_first_chunk::<N>() else {
            return Err(ShortBufferError);
        };
        *self = tail;
        Ok(*head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_extracts_from_front() {
        let bytes = [0x01, 0x02, 0x03, 0x04];
        let mut buf = &bytes[..];
        let result: [u8; 2] = buf.read().unwrap();
        assert_eq!(result, [0x01, 0x02]);
        assert_eq!(buf, &[0x03, 0x04]);
    }

    #[test]
    fn read_insufficient_data_errors() {
        let bytes = [0x01];
        let mut buf = &bytes[..];
        let result: Result<[u8; 4]> = buf.read();
        assert!(result.is_err());
        assert_eq!(buf, &[0x01]);
    }

    #[test]
    fn read_u32_le_parses_correctly() {
        let bytes = [0x04, 0x03, 0x02, 0x01, 0xFF];
        let mut buf = &bytes[..];
        assert_eq!(buf.read_u32_le().unwrap(), 0x01020304);
        assert_eq!(buf, &[0xFF]);
    }
}
