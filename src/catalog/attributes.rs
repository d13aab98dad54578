//! Category-specific hardware attributes.
//!
//! Exactly one variant per [`Category`]. Every field is optional because
//! sellers often list parts with incomplete spec sheets.

use serde::{Deserialize, Serialize};

use super::Category;

/// Attributes of a product, tagged by category.
///
/// JSON form: `{"category": "CPU", "socket": "AM5", "core_count": 8, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category")]
pub enum CategoryAttributes {
    #[serde(rename = "CPU")]
    Cpu(CpuSpecs),
    #[serde(rename = "Motherboard")]
    Motherboard(MotherboardSpecs),
    #[serde(rename = "Memory")]
    Memory(MemorySpecs),
    #[serde(rename = "Storage")]
    Storage(StorageSpecs),
    #[serde(rename = "Video Card")]
    VideoCard(VideoCardSpecs),
    #[serde(rename = "Power Supply")]
    PowerSupply(PowerSupplySpecs),
    #[serde(rename = "PC Case")]
    PcCase(PcCaseSpecs),
    #[serde(rename = "CPU Cooler")]
    CpuCooler(CpuCoolerSpecs),
    #[serde(rename = "Operating System")]
    OperatingSystem(OperatingSystemSpecs),
    #[serde(rename = "Monitor")]
    Monitor(MonitorSpecs),
}

impl CategoryAttributes {
    pub fn category(&self) -> Category {
        match self {
            CategoryAttributes::Cpu(_) => Category::Cpu,
            CategoryAttributes::Motherboard(_) => Category::Motherboard,
            CategoryAttributes::Memory(_) => Category::Memory,
            CategoryAttributes::Storage(_) => Category::Storage,
            CategoryAttributes::VideoCard(_) => Category::VideoCard,
            CategoryAttributes::PowerSupply(_) => Category::PowerSupply,
            CategoryAttributes::PcCase(_) => Category::PcCase,
            CategoryAttributes::CpuCooler(_) => Category::CpuCooler,
            CategoryAttributes::OperatingSystem(_) => Category::OperatingSystem,
            CategoryAttributes::Monitor(_) => Category::Monitor,
        }
    }

    /// Empty attribute set for a category.
    pub fn empty(category: Category) -> Self {
        match category {
            Category::Cpu => CategoryAttributes::Cpu(CpuSpecs::default()),
            Category::Motherboard => CategoryAttributes::Motherboard(MotherboardSpecs::default()),
            Category::Memory => CategoryAttributes::Memory(MemorySpecs::default()),
            Category::Storage => CategoryAttributes::Storage(StorageSpecs::default()),
            Category::VideoCard => CategoryAttributes::VideoCard(VideoCardSpecs::default()),
            Category::PowerSupply => CategoryAttributes::PowerSupply(PowerSupplySpecs::default()),
            Category::PcCase => CategoryAttributes::PcCase(PcCaseSpecs::default()),
            Category::CpuCooler => CategoryAttributes::CpuCooler(CpuCoolerSpecs::default()),
            Category::OperatingSystem => {
                CategoryAttributes::OperatingSystem(OperatingSystemSpecs::default())
            }
            Category::Monitor => CategoryAttributes::Monitor(MonitorSpecs::default()),
        }
    }

    /// Attribute fields as a JSON object, without the category tag.
    pub fn to_fields(&self) -> serde_json::Result<serde_json::Map<String, serde_json::Value>> {
        let mut fields = match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        fields.remove("category");
        Ok(fields)
    }

    /// Rebuild attributes from untagged fields of a known category.
    pub fn from_fields(
        category: Category,
        mut fields: serde_json::Map<String, serde_json::Value>,
    ) -> serde_json::Result<Self> {
        fields.insert(
            "category".to_string(),
            serde_json::Value::String(category.display_name().to_string()),
        );
        serde_json::from_value(serde_json::Value::Object(fields))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuSpecs {
    pub series: Option<String>,
    pub socket: Option<String>,
    pub core_count: Option<i64>,
    pub thread_count: Option<i64>,
    /// GHz.
    pub core_clock: Option<f64>,
    /// GHz.
    pub core_boost_clock: Option<f64>,
    /// Watts.
    pub tdp: Option<i64>,
    pub integrated_graphics: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotherboardSpecs {
    pub socket: Option<String>,
    pub form_factor: Option<String>,
    pub chipset: Option<String>,
    /// GB.
    pub memory_max: Option<i64>,
    pub memory_slots: Option<i64>,
    pub memory_type: Option<String>,
    pub sata_ports: Option<i64>,
    pub wifi: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySpecs {
    pub memory_type: Option<String>,
    pub speed: Option<String>,
    /// e.g. "2 x 16GB".
    pub modules: Option<String>,
    pub cas_latency: Option<i64>,
    pub voltage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSpecs {
    pub storage_type: Option<String>,
    pub capacity: Option<String>,
    pub interface: Option<String>,
    pub form_factor: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoCardSpecs {
    pub chipset: Option<String>,
    /// GB.
    pub memory: Option<i64>,
    pub memory_type: Option<String>,
    /// MHz.
    pub core_clock: Option<f64>,
    /// MHz.
    pub boost_clock: Option<f64>,
    pub interface: Option<String>,
    /// mm.
    pub length: Option<f64>,
    /// Watts.
    pub tdp: Option<i64>,
    pub cooling: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerSupplySpecs {
    pub wattage: Option<i64>,
    #[serde(rename = "type")]
    pub psu_type: Option<String>,
    pub efficiency_rating: Option<String>,
    /// mm.
    pub length: Option<f64>,
    pub modular: Option<String>,
    pub sata_connectors: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PcCaseSpecs {
    #[serde(rename = "type")]
    pub case_type: Option<String>,
    pub side_panel: Option<String>,
    pub color: Option<String>,
    /// mm.
    pub max_gpu_length: Option<f64>,
    /// Litres.
    pub volume: Option<f64>,
    pub dimensions: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuCoolerSpecs {
    pub fan_rpm: Option<String>,
    pub noise_level: Option<String>,
    pub color: Option<String>,
    /// mm.
    pub height: Option<f64>,
    pub water_cooled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSpecs {
    /// Inches.
    pub screen_size: Option<f64>,
    pub resolution: Option<String>,
    /// Hz.
    pub refresh_rate: Option<i64>,
    pub panel_type: Option<String>,
    pub aspect_ratio: Option<String>,
    pub brightness: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingSystemSpecs {
    pub model: Option<String>,
    pub mode: Option<String>,
    pub version: Option<String>,
    pub max_supported_memory: Option<String>,
}
