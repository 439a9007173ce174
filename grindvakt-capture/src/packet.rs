use bytes::Bytes;

/// One captured message, exactly as it arrived on the ingress interface.
#[derive(Debug, Clone)]
pub struct Packet {
    pub data: Bytes,
}

impl Packet {
    pub fn new(data: Vec<u8>) -> Self {
        Packet {
            data: Bytes::from(data),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
