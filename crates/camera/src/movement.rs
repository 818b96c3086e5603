use bitflags::bitflags;

bitflags! {
    /// Movement intents sampled once per frame.
    ///
    /// Flags combine freely: `FORWARD | RIGHT` moves diagonally, and opposing
    /// flags cancel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Movement: u8 {
        const RIGHT = 1;
        const LEFT = 1 << 1;
        const UP = 1 << 2;
        const DOWN = 1 << 3;
        const FORWARD = 1 << 4;
        const BACKWARD = 1 << 5;
    }
}

impl Movement {
    /// No movement this frame.
    pub const IDLE: Self = Self::empty();

    /// Parse a comma-separated list of flag names, case-insensitive.
    ///
    /// `"forward,right"` yields `FORWARD | RIGHT`; an empty string or `"idle"`
    /// yields [`Movement::IDLE`]. Returns the first unrecognised name on failure.
    pub fn parse_list(list: &str) -> Result<Self, String> {
        let mut flags = Self::IDLE;
        for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let upper = name.to_ascii_uppercase();
            if upper == "IDLE" {
                continue;
            }
            match Self::from_name(&upper) {
                Some(flag) => flags |= flag,
                None => return Err(name.to_string()),
            }
        }
        Ok(flags)
    }

    /// Signed axis factors `(forward, right, up)`, each in {-1, 0, 1}.
    pub(crate) fn axes(self) -> (f32, f32, f32) {
        let axis = |pos: Self, neg: Self| -> f32 {
            match (self.contains(pos), self.contains(neg)) {
                (true, false) => 1.0,
                (false, true) => -1.0,
                _ => 0.0,
            }
        };
        (
            axis(Self::FORWARD, Self::BACKWARD),
            axis(Self::RIGHT, Self::LEFT),
            axis(Self::UP, Self::DOWN),
        )
    }
}
