//! Usage weight profiles.

use std::fmt;

use crate::catalog::Category;

/// How the buyer intends to use the build.
///
/// Each profile splits a budget across the ten categories; the weights of
/// a profile sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UsageProfile {
    #[default]
    Gaming,
    Workstation,
    Multimedia,
}

impl UsageProfile {
    pub const ALL: [UsageProfile; 3] = [
        UsageProfile::Gaming,
        UsageProfile::Workstation,
        UsageProfile::Multimedia,
    ];

    /// Look up a profile by its normalized name (`"gaming"`, ...).
    pub fn from_usage(usage: &str) -> Option<Self> {
        match usage {
            "gaming" => Some(UsageProfile::Gaming),
            "workstation" => Some(UsageProfile::Workstation),
            "multimedia" => Some(UsageProfile::Multimedia),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UsageProfile::Gaming => "gaming",
            UsageProfile::Workstation => "workstation",
            UsageProfile::Multimedia => "multimedia",
        }
    }

    /// Share of the budget allotted to `category`.
    pub fn weight(self, category: Category) -> f64 {
        use Category::*;
        use UsageProfile::*;

        match (self, category) {
            (Gaming, Cpu) => 0.15,
            (Gaming, VideoCard) => 0.30,
            (Gaming, Memory) => 0.10,
            (Gaming, Storage) => 0.10,
            (Gaming, Motherboard) => 0.12,
            (Gaming, PowerSupply) => 0.06,
            (Gaming, PcCase) => 0.05,
            (Gaming, CpuCooler) => 0.03,
            (Gaming, OperatingSystem) => 0.04,
            (Gaming, Monitor) => 0.05,

            (Workstation, Cpu) => 0.25,
            (Workstation, VideoCard) => 0.20,
            (Workstation, Memory) => 0.12,
            (Workstation, Storage) => 0.12,
            (Workstation, Motherboard) => 0.12,
            (Workstation, PowerSupply) => 0.06,
            (Workstation, PcCase) => 0.04,
            (Workstation, CpuCooler) => 0.03,
            (Workstation, OperatingSystem) => 0.03,
            (Workstation, Monitor) => 0.03,

            (Multimedia, Cpu) => 0.18,
            (Multimedia, VideoCard) => 0.22,
            (Multimedia, Memory) => 0.10,
            (Multimedia, Storage) => 0.10,
            (Multimedia, Motherboard) => 0.12,
            (Multimedia, PowerSupply) => 0.05,
            (Multimedia, PcCase) => 0.05,
            (Multimedia, CpuCooler) => 0.03,
            (Multimedia, OperatingSystem) => 0.05,
            (Multimedia, Monitor) => 0.10,
        }
    }
}

impl fmt::Display for UsageProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
