use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindmapConfig {
    /// Distance between consecutive rings; level `n` sits at `n * ring_radius`.
    pub ring_radius: f32,
    /// Angular wedge below the root left empty when the first ring is
    /// distributed, so the map fans out from the top.
    pub top_exclusion_angle: f32,
    /// Angular width children are spread across, centered on their parent's angle.
    pub spread_angle: f32,
    /// Perpendicular offset between siblings that share a parent.
    pub sibling_spacing: f32,
}

impl Default for MindmapConfig {
    fn default() -> Self {
        Self {
            ring_radius: 300.0,
            top_exclusion_angle: PI / 3.0,
            spread_angle: PI / 6.0,
            sibling_spacing: 150.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowchartConfig {
    pub level_spacing: f32,
    pub sibling_spacing: f32,
    pub branch_offset: f32,
    pub center_x: f32,
    pub decision_kinds: Vec<String>,
    /// Branch labels (case-insensitive) that mark the left-hand branch.
    pub yes_labels: Vec<String>,
    /// Branch labels (case-insensitive) that mark the right-hand branch.
    pub no_labels: Vec<String>,
}

impl Default for FlowchartConfig {
    fn default() -> Self {
        Self {
            level_spacing: 150.0,
            sibling_spacing: 200.0,
            branch_offset: 150.0,
            center_x: 250.0,
            decision_kinds: vec!["decision".to_string()],
            yes_labels: vec!["yes".to_string()],
            no_labels: vec!["no".to_string()],
        }
    }
}

impl FlowchartConfig {
    pub fn is_decision(&self, kind: &str) -> bool {
        self.decision_kinds.iter().any(|k| k == kind)
    }

    pub fn is_yes_label(&self, label: &str) -> bool {
        matches_label(&self.yes_labels, label)
    }

    pub fn is_no_label(&self, label: &str) -> bool {
        matches_label(&self.no_labels, label)
    }

    /// Label written onto an unlabeled decision edge after placement.
    pub fn yes_display(&self) -> String {
        display_label(&self.yes_labels, "Yes")
    }

    pub fn no_display(&self) -> String {
        display_label(&self.no_labels, "No")
    }
}

fn matches_label(values: &[String], label: &str) -> bool {
    let label = label.trim();
    values.iter().any(|value| value.eq_ignore_ascii_case(label))
}

fn display_label(values: &[String], fallback: &str) -> String {
    let Some(first) = values.first() else {
        return fallback.to_string();
    };
    let mut chars = first.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => fallback.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub mindmap: MindmapConfig,
    pub flowchart: FlowchartConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct MindmapConfigFile {
    ring_radius: Option<f32>,
    top_exclusion_angle: Option<f32>,
    spread_angle: Option<f32>,
    sibling_spacing: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct FlowchartConfigFile {
    level_spacing: Option<f32>,
    sibling_spacing: Option<f32>,
    branch_offset: Option<f32>,
    center_x: Option<f32>,
    decision_kinds: Option<Vec<String>>,
    yes_labels: Option<Vec<String>>,
    no_labels: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    level_spacing: Option<f32>,
    sibling_spacing: Option<f32>,
    branch_offset: Option<f32>,
    center_x: Option<f32>,
    top_exclusion_angle: Option<f32>,
    ring_radius: Option<f32>,
    mindmap: Option<MindmapConfigFile>,
    flowchart: Option<FlowchartConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Applies a camelCase config document on top of the defaults.
///
/// Flat keys (`levelSpacing`, `ringRadius`, ...) are applied first, then the
/// `mindmap` and `flowchart` sections, so a section value wins over a flat one.
pub fn parse_config(contents: &str) -> anyhow::Result<LayoutConfig> {
    let mut config = LayoutConfig::default();
    if contents.trim().is_empty() {
        return Ok(config);
    }
    let parsed: ConfigFile = json5::from_str(contents)
        .map_err(|err| anyhow::anyhow!("invalid layout config: {err}"))?;

    if let Some(v) = parsed.level_spacing {
        config.flowchart.level_spacing = v;
    }
    if let Some(v) = parsed.sibling_spacing {
        config.flowchart.sibling_spacing = v;
        config.mindmap.sibling_spacing = v;
    }
    if let Some(v) = parsed.branch_offset {
        config.flowchart.branch_offset = v;
    }
    if let Some(v) = parsed.center_x {
        config.flowchart.center_x = v;
    }
    if let Some(v) = parsed.top_exclusion_angle {
        config.mindmap.top_exclusion_angle = v;
    }
    if let Some(v) = parsed.ring_radius {
        config.mindmap.ring_radius = v;
    }

    if let Some(mindmap) = parsed.mindmap {
        if let Some(v) = mindmap.ring_radius {
            config.mindmap.ring_radius = v;
        }
        if let Some(v) = mindmap.top_exclusion_angle {
            config.mindmap.top_exclusion_angle = v;
        }
        if let Some(v) = mindmap.spread_angle {
            config.mindmap.spread_angle = v;
        }
        if let Some(v) = mindmap.sibling_spacing {
            config.mindmap.sibling_spacing = v;
        }
    }

    if let Some(flowchart) = parsed.flowchart {
        if let Some(v) = flowchart.level_spacing {
            config.flowchart.level_spacing = v;
        }
        if let Some(v) = flowchart.sibling_spacing {
            config.flowchart.sibling_spacing = v;
        }
        if let Some(v) = flowchart.branch_offset {
            config.flowchart.branch_offset = v;
        }
        if let Some(v) = flowchart.center_x {
            config.flowchart.center_x = v;
        }
        if let Some(v) = flowchart.decision_kinds {
            config.flowchart.decision_kinds = v;
        }
        if let Some(v) = flowchart.yes_labels {
            config.flowchart.yes_labels = v;
        }
        if let Some(v) = flowchart.no_labels {
            config.flowchart.no_labels = v;
        }
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &LayoutConfig) -> anyhow::Result<()> {
    let checks = [
        ("ringRadius", config.mindmap.ring_radius),
        ("siblingSpacing", config.flowchart.sibling_spacing),
        ("levelSpacing", config.flowchart.level_spacing),
        ("branchOffset", config.flowchart.branch_offset),
    ];
    for (name, value) in checks {
        if !value.is_finite() || value <= 0.0 {
            anyhow::bail!("{name} must be a positive number, got {value}");
        }
    }
    let excl = config.mindmap.top_exclusion_angle;
    if !excl.is_finite() || !(0.0..2.0 * PI).contains(&excl) {
        anyhow::bail!("topExclusionAngle must be in [0, 2π), got {excl}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(parse_config("").unwrap(), LayoutConfig::default());
        assert_eq!(parse_config("{}").unwrap(), LayoutConfig::default());
    }

    #[test]
    fn flat_keys_and_sections_override_defaults() {
        let config = parse_config(
            r#"{
                // json5 comments are fine
                levelSpacing: 100,
                siblingSpacing: 120,
                ringRadius: 250,
                flowchart: { siblingSpacing: 180, decisionKinds: ["decision", "choice"] },
            }"#,
        )
        .unwrap();
        assert_eq!(config.flowchart.level_spacing, 100.0);
        assert_eq!(config.flowchart.sibling_spacing, 180.0);
        assert_eq!(config.mindmap.sibling_spacing, 120.0);
        assert_eq!(config.mindmap.ring_radius, 250.0);
        assert!(config.flowchart.is_decision("choice"));
        assert_eq!(config.flowchart.branch_offset, 150.0);
    }

    #[test]
    fn rejects_non_positive_spacing() {
        assert!(parse_config("{ levelSpacing: 0 }").is_err());
        assert!(parse_config("{ topExclusionAngle: 7 }").is_err());
        assert!(parse_config("{ levelSpacing: 'wide' }").is_err());
    }

    #[test]
    fn rejects_branch_offset_that_would_flip_sides() {
        assert!(parse_config("{ branchOffset: 0 }").is_err());
        assert!(parse_config("{ flowchart: { branchOffset: -10 } }").is_err());
        assert!(parse_config("{ branchOffset: 40 }").is_ok());
    }

    #[test]
    fn branch_labels_match_case_insensitively() {
        let flow = FlowchartConfig::default();
        assert!(flow.is_yes_label(" YES "));
        assert!(flow.is_no_label("no"));
        assert!(!flow.is_yes_label("maybe"));
        assert_eq!(flow.yes_display(), "Yes");
        assert_eq!(flow.no_display(), "No");
    }
}
