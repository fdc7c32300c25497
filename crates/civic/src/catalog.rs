//! Issue catalog: categories, their issue types, and severity levels.
//!
//! Each category owns its own issue enum, and [`SubCategory`] wraps exactly one
//! of them, so a subcategory always knows which category it belongs to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Errors from resolving catalog identifiers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    #[error("Unknown issue type '{id}' for category '{category}'")]
    UnknownSubCategory { category: Category, id: String },

    #[error("Unknown severity '{0}'")]
    UnknownSeverity(String),
}

/// Top-level issue category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Waste,
    Water,
    Air,
    Power,
    Transport,
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 6] = [
        Category::Waste,
        Category::Water,
        Category::Air,
        Category::Power,
        Category::Transport,
        Category::Other,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Category::Waste => "waste",
            Category::Water => "water",
            Category::Air => "air",
            Category::Power => "power",
            Category::Transport => "transport",
            Category::Other => "other",
        }
    }

    /// Human-readable category name.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Waste => "Waste & Garbage",
            Category::Water => "Water & Sewage",
            Category::Air => "Air Pollution",
            Category::Power => "Electricity",
            Category::Transport => "Roads & Traffic",
            Category::Other => "Other Issue",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Category::ALL.into_iter().find(|c| c.id() == id)
    }

    /// The issue types that may be reported under this category.
    pub fn sub_categories(&self) -> Vec<SubCategory> {
        match self {
            Category::Waste => WasteIssue::ALL.iter().copied().map(SubCategory::from).collect(),
            Category::Water => WaterIssue::ALL.iter().copied().map(SubCategory::from).collect(),
            Category::Air => AirIssue::ALL.iter().copied().map(SubCategory::from).collect(),
            Category::Power => PowerIssue::ALL.iter().copied().map(SubCategory::from).collect(),
            Category::Transport => TransportIssue::ALL
                .iter()
                .copied()
                .map(SubCategory::from)
                .collect(),
            Category::Other => OtherIssue::ALL.iter().copied().map(SubCategory::from).collect(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_id(s).ok_or_else(|| CatalogError::UnknownCategory(s.to_string()))
    }
}

macro_rules! issue_kind {
    (
        $(#[$meta:meta])*
        $name:ident => $wrapper:ident {
            $($variant:ident => ($id:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn id(&self) -> &'static str {
                match self {
                    $($name::$variant => $id),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_id(id: &str) -> Option<Self> {
                match id {
                    $($id => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl From<$name> for SubCategory {
            fn from(issue: $name) -> Self {
                SubCategory::$wrapper(issue)
            }
        }
    };
}

issue_kind! {
    /// Issue types under [`Category::Waste`].
    WasteIssue => Waste {
        GarbagePile => ("garbage_pile", "Garbage Pile"),
        DustbinOverflow => ("dustbin_overflow", "Dustbin Overflow"),
        DeadAnimal => ("dead_animal", "Dead Animal"),
        ConstructionDebris => ("construction_debris", "Construction Debris"),
        Burning => ("burning", "Garbage Burning"),
    }
}

issue_kind! {
    /// Issue types under [`Category::Water`].
    WaterIssue => Water {
        Leakage => ("leakage", "Pipeline Leakage"),
        NoSupply => ("no_supply", "No Water Supply"),
        DirtyWater => ("dirty_water", "Contaminated Water"),
        SewerBlockage => ("sewer_blockage", "Sewer Blockage/Overflow"),
    }
}

issue_kind! {
    /// Issue types under [`Category::Air`].
    AirIssue => Air {
        ConstructionDust => ("construction_dust", "Construction Dust"),
        IndustrialSmoke => ("industrial_smoke", "Industrial Smoke"),
        VehiclePollution => ("vehicle_pollution", "Visible Vehicle Emission"),
        CropBurning => ("crop_burning", "Crop Residue Burning"),
    }
}

issue_kind! {
    /// Issue types under [`Category::Power`].
    PowerIssue => Power {
        PowerCut => ("power_cut", "Power Failure"),
        StreetLight => ("street_light", "Street Light Not Working"),
        HangingWires => ("hanging_wires", "Dangerous Hanging Wires"),
        Transformer => ("transformer", "Transformer Issues"),
    }
}

issue_kind! {
    /// Issue types under [`Category::Transport`].
    TransportIssue => Transport {
        Pothole => ("pothole", "Pothole / Broken Road"),
        Footpath => ("footpath", "Broken Footpath"),
        TrafficSignal => ("traffic_signal", "Traffic Signal Fault"),
        Encroachment => ("encroachment", "Illegal Encroachment"),
    }
}

issue_kind! {
    /// Issue types under [`Category::Other`].
    OtherIssue => Other {
        Noise => ("noise", "Noise Pollution"),
        Park => ("park", "Park Maintenance"),
        StrayDog => ("stray_dog", "Stray Dog Menace"),
        Other => ("other", "Something Else"),
    }
}

/// A specific issue type, tagged by the category it belongs to.
///
/// Serializes as the bare issue id (e.g. `"garbage_pile"`); ids are only unique
/// within a category, so parsing always goes through [`SubCategory::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubCategory {
    Waste(WasteIssue),
    Water(WaterIssue),
    Air(AirIssue),
    Power(PowerIssue),
    Transport(TransportIssue),
    Other(OtherIssue),
}

impl SubCategory {
    pub fn category(&self) -> Category {
        match self {
            SubCategory::Waste(_) => Category::Waste,
            SubCategory::Water(_) => Category::Water,
            SubCategory::Air(_) => Category::Air,
            SubCategory::Power(_) => Category::Power,
            SubCategory::Transport(_) => Category::Transport,
            SubCategory::Other(_) => Category::Other,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            SubCategory::Waste(i) => i.id(),
            SubCategory::Water(i) => i.id(),
            SubCategory::Air(i) => i.id(),
            SubCategory::Power(i) => i.id(),
            SubCategory::Transport(i) => i.id(),
            SubCategory::Other(i) => i.id(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubCategory::Waste(i) => i.label(),
            SubCategory::Water(i) => i.label(),
            SubCategory::Air(i) => i.label(),
            SubCategory::Power(i) => i.label(),
            SubCategory::Transport(i) => i.label(),
            SubCategory::Other(i) => i.label(),
        }
    }

    /// Resolves an issue id within `category`.
    pub fn parse(category: Category, id: &str) -> Result<Self, CatalogError> {
        let found = match category {
            Category::Waste => WasteIssue::from_id(id).map(SubCategory::from),
            Category::Water => WaterIssue::from_id(id).map(SubCategory::from),
            Category::Air => AirIssue::from_id(id).map(SubCategory::from),
            Category::Power => PowerIssue::from_id(id).map(SubCategory::from),
            Category::Transport => TransportIssue::from_id(id).map(SubCategory::from),
            Category::Other => OtherIssue::from_id(id).map(SubCategory::from),
        };
        found.ok_or_else(|| CatalogError::UnknownSubCategory {
            category,
            id: id.to_string(),
        })
    }
}

impl fmt::Display for SubCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl Serialize for SubCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

/// How urgent the reporter considers the issue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    /// Civic points awarded for a report of this severity.
    pub fn points(&self) -> u32 {
        match self {
            Severity::Low => 20,
            Severity::Medium => 50,
            Severity::High => 75,
            Severity::Critical => 100,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Severity {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|sev| sev.id() == s)
            .ok_or_else(|| CatalogError::UnknownSeverity(s.to_string()))
    }
}
