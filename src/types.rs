use serde::{Deserialize, Deserializer, Serialize};

/// Trailer bed interior, centimetres. X is the long axis (front = 0),
/// Y the cross axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trailer {
    #[serde(deserialize_with = "deserialize_i32_from_number")]
    pub length: i32,
    #[serde(deserialize_with = "deserialize_i32_from_number")]
    pub width: i32,
}

impl Trailer {
    /// X-axis snap raster used by the interactive editor.
    pub const GRID_STEP: i32 = 10;
    /// Occupancy-cell size of the batch packer.
    pub const PACK_CELL: i32 = 10;
    /// Visual grid recorded in saved-layout metadata; not used for snapping.
    pub const LAYOUT_CELL: i32 = 25;
    /// Gap left between tiled spawn positions.
    pub const SPAWN_GAP: i32 = 8;

    pub fn new(length: i32, width: i32) -> Self {
        Self { length, width }
    }

    /// Reefer configuration, 1360 x 245.
    pub fn reefer() -> Self {
        Self::new(1360, 245)
    }

    /// Tautliner configuration, 1360 x 240.
    pub fn tautliner() -> Self {
        Self::new(1360, 240)
    }
}

/// Pallet footprint types with canonical sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PalletKind {
    Euro,
    Industrie,
    Blumenwagen,
    #[serde(rename = "IBC")]
    Ibc,
    Custom,
}

impl PalletKind {
    /// Canonical footprint (longitudinal orientation for Euro), cm.
    /// Custom has no canonical size; callers always supply one.
    pub fn size(&self) -> Option<(i32, i32)> {
        match self {
            PalletKind::Euro => Some((120, 80)),
            PalletKind::Industrie => Some((120, 100)),
            PalletKind::Blumenwagen => Some((135, 55)),
            PalletKind::Ibc => Some((120, 100)),
            PalletKind::Custom => None,
        }
    }

    /// Heavy types count double in the axle estimate.
    pub fn heavy(&self) -> bool {
        matches!(self, PalletKind::Industrie | PalletKind::Ibc)
    }

    /// Fill color handed to the rendering surface.
    pub fn color(&self) -> &'static str {
        match self {
            PalletKind::Euro => "#7cb342",
            PalletKind::Industrie => "#ef6c00",
            PalletKind::Blumenwagen => "#29b6f6",
            PalletKind::Ibc => "#8d6e63",
            PalletKind::Custom => "#ab47bc",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PalletKind::Euro => "Euro",
            PalletKind::Industrie => "Industrie",
            PalletKind::Blumenwagen => "Blumenwagen",
            PalletKind::Ibc => "IBC",
            PalletKind::Custom => "Custom",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Euro" => Some(PalletKind::Euro),
            "Industrie" => Some(PalletKind::Industrie),
            "Blumenwagen" => Some(PalletKind::Blumenwagen),
            "IBC" => Some(PalletKind::Ibc),
            "Custom" => Some(PalletKind::Custom),
            _ => None,
        }
    }
}

impl std::fmt::Display for PalletKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Spawn commands offered by the editor toolbar. Euro has two explicit
/// orientations; the stored object carries no angle either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    EuroLong,
    EuroTrans,
    Industrie,
}

impl SpawnKind {
    pub fn kind(&self) -> PalletKind {
        match self {
            SpawnKind::EuroLong | SpawnKind::EuroTrans => PalletKind::Euro,
            SpawnKind::Industrie => PalletKind::Industrie,
        }
    }

    pub fn size(&self) -> (i32, i32) {
        match self {
            SpawnKind::EuroLong => (120, 80),
            SpawnKind::EuroTrans => (80, 120),
            SpawnKind::Industrie => (120, 100),
        }
    }
}

/// An object on the bed. Position and size are integer cm relative to the
/// trailer interior; rotation is already folded into (w, h).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placed {
    pub id: u64,
    pub kind: PalletKind,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub selectable: bool,
    pub evented: bool,
}

impl Placed {
    pub fn heavy(&self) -> bool {
        self.kind.heavy()
    }
}

/// Object record echoed back by a rendering surface each tick. Scale and
/// angle default when the surface omits them; a record that fails to
/// deserialize at all is dropped for that tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EchoedObject {
    pub id: Option<u64>,
    pub name: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    #[serde(rename = "scaleX", default = "default_scale")]
    pub scale_x: f64,
    #[serde(rename = "scaleY", default = "default_scale")]
    pub scale_y: f64,
    #[serde(default)]
    pub angle: f64,
}

fn default_scale() -> f64 {
    1.0
}

impl EchoedObject {
    /// Width/height with the surface's scale factors applied, rounded cm.
    pub fn effective_size(&self) -> (i32, i32) {
        (
            (self.width * self.scale_x).round() as i32,
            (self.height * self.scale_y).round() as i32,
        )
    }

    /// Straight projection of a stored object, as a well-behaved surface
    /// would echo it back untouched.
    pub fn from_placed(p: &Placed) -> Self {
        Self {
            id: Some(p.id),
            name: p.kind.name().to_string(),
            left: p.x as f64,
            top: p.y as f64,
            width: p.w as f64,
            height: p.h as f64,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
        }
    }

    /// Tolerant boundary for duck-typed surface data: elements that are
    /// missing fields or carry non-numeric values are skipped.
    pub fn parse_list(values: &[serde_json::Value]) -> Vec<EchoedObject> {
        values
            .iter()
            .filter_map(|v| serde_json::from_value(v.clone()).ok())
            .collect()
    }
}

/// Accepts JSON floats where an integer is expected (surfaces report
/// fractional pixel coordinates).
pub fn deserialize_i32_from_number<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = f64::deserialize(deserializer)?;
    if !n.is_finite() {
        return Err(serde::de::Error::custom("expected a finite number"));
    }
    Ok(n.round() as i32)
}

/// Same coercion for unsigned count fields; negative numbers are errors.
pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = f64::deserialize(deserializer)?;
    if !n.is_finite() || n < 0.0 {
        return Err(serde::de::Error::custom("expected a non-negative number"));
    }
    Ok(n.round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_sizes() {
        assert_eq!(PalletKind::Euro.size(), Some((120, 80)));
        assert_eq!(PalletKind::Industrie.size(), Some((120, 100)));
        assert_eq!(PalletKind::Blumenwagen.size(), Some((135, 55)));
        assert_eq!(PalletKind::Ibc.size(), Some((120, 100)));
        assert_eq!(PalletKind::Custom.size(), None);
    }

    #[test]
    fn test_heavy_flags() {
        assert!(PalletKind::Industrie.heavy());
        assert!(PalletKind::Ibc.heavy());
        assert!(!PalletKind::Euro.heavy());
        assert!(!PalletKind::Blumenwagen.heavy());
    }

    #[test]
    fn test_kind_name_roundtrip() {
        for kind in [
            PalletKind::Euro,
            PalletKind::Industrie,
            PalletKind::Blumenwagen,
            PalletKind::Ibc,
            PalletKind::Custom,
        ] {
            assert_eq!(PalletKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(PalletKind::from_name("Halbpalette"), None);
    }

    #[test]
    fn test_ibc_serializes_uppercase() {
        let json = serde_json::to_string(&PalletKind::Ibc).unwrap();
        assert_eq!(json, "\"IBC\"");
    }

    #[test]
    fn test_echo_defaults_scale_and_angle() {
        let v: serde_json::Value = serde_json::from_str(
            r#"{"id": 3, "name": "Euro", "left": 10.0, "top": 0.0, "width": 120.0, "height": 80.0}"#,
        )
        .unwrap();
        let echoes = EchoedObject::parse_list(std::slice::from_ref(&v));
        assert_eq!(echoes.len(), 1);
        assert_eq!(echoes[0].scale_x, 1.0);
        assert_eq!(echoes[0].angle, 0.0);
    }

    #[test]
    fn test_malformed_echo_is_skipped() {
        let values: Vec<serde_json::Value> = serde_json::from_str(
            r#"[{"name": "Euro", "left": "oops", "top": 0, "width": 120, "height": 80},
                {"id": 7, "name": "Euro", "left": 5, "top": 0, "width": 120, "height": 80}]"#,
        )
        .unwrap();
        let echoes = EchoedObject::parse_list(&values);
        assert_eq!(echoes.len(), 1);
        assert_eq!(echoes[0].id, Some(7));
    }

    #[test]
    fn test_u32_coercion() {
        #[derive(Deserialize)]
        struct Qty(#[serde(deserialize_with = "deserialize_u32_from_number")] u32);

        let q: Qty = serde_json::from_str("10.0").unwrap();
        assert_eq!(q.0, 10);
        let q: Qty = serde_json::from_str("3.6").unwrap();
        assert_eq!(q.0, 4);
        assert!(serde_json::from_str::<Qty>("-1").is_err());
        assert!(serde_json::from_str::<Qty>("\"ten\"").is_err());
    }

    #[test]
    fn test_effective_size_applies_scale() {
        let mut e = EchoedObject::from_placed(&Placed {
            id: 1,
            kind: PalletKind::Euro,
            x: 0,
            y: 0,
            w: 120,
            h: 80,
            selectable: true,
            evented: true,
        });
        e.scale_x = 0.5;
        e.scale_y = 1.5;
        assert_eq!(e.effective_size(), (60, 120));
    }
}
