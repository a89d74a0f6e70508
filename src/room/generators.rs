use rand::Rng;

/// Length of generated room codes
pub const DEFAULT_ROOM_ID_LENGTH: usize = 6;

/// Trait for generating room identifiers
pub trait RoomIdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random uppercase room codes, e.g. "QWERTY"
pub struct RandomRoomIdGenerator {
    length: usize,
}

impl RandomRoomIdGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomRoomIdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ROOM_ID_LENGTH)
    }
}

impl RoomIdGenerator for RandomRoomIdGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::rng();
        (0..self.length)
            .map(|_| rng.random_range(b'A'..=b'Z') as char)
            .collect()
    }
}
