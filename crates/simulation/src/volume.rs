use rust_decimal::Decimal;

/// Models the traded volume of a pool, in quote-token units per step.
pub trait VolumeModel: Send + Sync {
    fn next_volume(&mut self) -> Decimal;
}

/// Constant volume model.
#[derive(Debug, Clone)]
pub struct ConstantVolume {
    pub volume: Decimal,
}

impl ConstantVolume {
    #[must_use]
    pub fn new(volume: Decimal) -> Self {
        Self { volume }
    }
}

impl VolumeModel for ConstantVolume {
    fn next_volume(&mut self) -> Decimal {
        self.volume
    }
}
