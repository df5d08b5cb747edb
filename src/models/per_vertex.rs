use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::CommandError;

/// The per-vertex maps that may be queried or edited. Any other plug name is
/// rejected before the scene is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PerVertexAttribute {
    Thickness,
    Bounce,
    Friction,
    Damp,
    Stickiness,
    CollideStrength,
    Mass,
    FieldMagnitude,
    Stretch,
    Compression,
    Bend,
    BendAngleDropoff,
    RestitutionAngle,
    Rigidity,
    Deform,
    InputAttract,
    RestLengthScale,
    Lift,
    Drag,
    TangentialDrag,
    Wrinkle,
}

static BY_PLUG_NAME: Lazy<HashMap<&'static str, PerVertexAttribute>> = Lazy::new(|| {
    PerVertexAttribute::ALL
        .iter()
        .map(|attr| (attr.plug_name(), *attr))
        .collect()
});

impl PerVertexAttribute {
    pub const ALL: [PerVertexAttribute; 21] = [
        PerVertexAttribute::Thickness,
        PerVertexAttribute::Bounce,
        PerVertexAttribute::Friction,
        PerVertexAttribute::Damp,
        PerVertexAttribute::Stickiness,
        PerVertexAttribute::CollideStrength,
        PerVertexAttribute::Mass,
        PerVertexAttribute::FieldMagnitude,
        PerVertexAttribute::Stretch,
        PerVertexAttribute::Compression,
        PerVertexAttribute::Bend,
        PerVertexAttribute::BendAngleDropoff,
        PerVertexAttribute::RestitutionAngle,
        PerVertexAttribute::Rigidity,
        PerVertexAttribute::Deform,
        PerVertexAttribute::InputAttract,
        PerVertexAttribute::RestLengthScale,
        PerVertexAttribute::Lift,
        PerVertexAttribute::Drag,
        PerVertexAttribute::TangentialDrag,
        PerVertexAttribute::Wrinkle,
    ];

    /// Attribute name as it appears on the simulation node
    pub fn plug_name(self) -> &'static str {
        match self {
            PerVertexAttribute::Thickness => "thicknessPerVertex",
            PerVertexAttribute::Bounce => "bouncePerVertex",
            PerVertexAttribute::Friction => "frictionPerVertex",
            PerVertexAttribute::Damp => "dampPerVertex",
            PerVertexAttribute::Stickiness => "stickinessPerVertex",
            PerVertexAttribute::CollideStrength => "collideStrengthPerVertex",
            PerVertexAttribute::Mass => "massPerVertex",
            PerVertexAttribute::FieldMagnitude => "fieldMagnitudePerVertex",
            PerVertexAttribute::Stretch => "stretchPerVertex",
            PerVertexAttribute::Compression => "compressionPerVertex",
            PerVertexAttribute::Bend => "bendPerVertex",
            PerVertexAttribute::BendAngleDropoff => "bendAngleDropoffPerVertex",
            PerVertexAttribute::RestitutionAngle => "restitutionAnglePerVertex",
            PerVertexAttribute::Rigidity => "rigidityPerVertex",
            PerVertexAttribute::Deform => "deformPerVertex",
            PerVertexAttribute::InputAttract => "inputAttractPerVertex",
            PerVertexAttribute::RestLengthScale => "restLengthScalePerVertex",
            PerVertexAttribute::Lift => "liftPerVertex",
            PerVertexAttribute::Drag => "dragPerVertex",
            PerVertexAttribute::TangentialDrag => "tangentialDragPerVertex",
            PerVertexAttribute::Wrinkle => "wrinklePerVertex",
        }
    }

    /// Validate an optional plug name coming from a command invocation
    pub fn from_plug_arg(plug_name: Option<&str>) -> Result<Self, CommandError> {
        match plug_name {
            Some(name) => name.parse(),
            None => Err(CommandError::InvalidArgument(
                "plugName flag must be set".to_string(),
            )),
        }
    }
}

impl FromStr for PerVertexAttribute {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BY_PLUG_NAME
            .get(s)
            .copied()
            .ok_or_else(|| CommandError::InvalidArgument(format!("Invalid Plug Name: {}", s)))
    }
}

impl fmt::Display for PerVertexAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.plug_name())
    }
}

/// Allocated double-array container bound to a per-vertex plug.
/// Slot `i` holds the weight of vertex `i`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoubleArrayData(Vec<f64>);

impl DoubleArrayData {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overwrite one slot. Returns false when `index` is past the end.
    pub fn set(&mut self, index: usize, value: f64) -> bool {
        match self.0.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.0.clone()
    }
}

impl From<Vec<f64>> for DoubleArrayData {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

// =============================================================================
// Command arguments
// =============================================================================

/// Arguments of `getNClothPerVertex`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPerVertexArgs {
    /// Node name; the active selection is used when absent
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub plug_name: Option<String>,
}

/// Arguments of `setNClothPerVertex`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPerVertexArgs {
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub plug_name: Option<String>,
    /// One entry per `vertexWeight` flag use, in order
    #[serde(default)]
    pub vertex_weights: Option<Vec<f64>>,
}
