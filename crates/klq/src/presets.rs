//! Catalog of named example queries, grouped by subject.

use serde::Serialize;

/// A named query string. Presets run through the ordinary parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preset {
    pub label: &'static str,
    pub query: &'static str,
    pub group: &'static str,
}

impl Preset {
    const fn new(label: &'static str, query: &'static str, group: &'static str) -> Self {
        Self { label, query, group }
    }
}

pub static PRESETS: [Preset; 71] = [
    Preset::new("All companies", "companies", "industry"),
    Preset::new("No security", "companies | where security_posture == \"none_published\"", "industry"),
    Preset::new("Funded but insecure", "companies | where funding_total_usd > 100000000 | where security_posture == \"none_published\"", "industry"),
    Preset::new("Invasive devices", "devices | where type == \"invasive\" | sort by channels desc", "industry"),
    Preset::new("High-channel", "devices | where channels > 100", "industry"),
    Preset::new("Hardware specs", "hardware_specs | sort by channels desc", "industry"),
    Preset::new("Critical threats", "techniques | where severity == \"critical\"", "threats"),
    Preset::new("By tactic", "techniques | summarize count() by tactic", "threats"),
    Preset::new("By status", "techniques | summarize count() by status", "threats"),
    Preset::new("All tactics", "tactics", "threats"),
    Preset::new("Top CVEs", "cves | sort by cvss desc | take 10", "threats"),
    Preset::new("Brain regions", "brain_regions | sort by qif_band asc", "neuro"),
    Preset::new("Hourglass bands", "hourglass_bands", "neuro"),
    Preset::new("DSM-5", "dsm5 | sort by cluster asc", "neuro"),
    Preset::new("Neurorights", "neurorights", "neuro"),
    Preset::new("Frameworks", "frameworks", "governance"),
    Preset::new("Consent tiers", "consent_tiers", "governance"),
    Preset::new("Controls", "controls | summarize count() by band", "governance"),
    Preset::new("NSP layers", "nsp_layers", "governance"),
    Preset::new("Policy timeline", "policy | sort by date desc", "governance"),
    Preset::new("Wireless comms", "comms | project device, wireless_protocol, rf_band, encryption, data_link_risk", "comms"),
    Preset::new("BLE devices", "comms | where wireless_protocol contains \"bluetooth\" | project device, encryption, data_link_risk, firmware_platform", "comms"),
    Preset::new("Unencrypted", "comms | where encryption contains \"None\" | project device, wireless_protocol, encryption, firmware_platform", "comms"),
    Preset::new("High-risk links", "comms | where data_link_risk contains \"HIGH\" | project device, wireless_protocol, encryption, rf_band", "comms"),
    Preset::new("Firmware stack", "comms | project device, firmware_platform, device_type", "comms"),
    Preset::new("Top funding", "funding | sort by amount_usd desc", "market"),
    Preset::new("Market forecasts", "market_forecasts | sort by year asc", "market"),
    Preset::new("VC deal flow", "vc_deals | sort by year desc", "market"),
    Preset::new("Security gap", "security_gap | sort by size_2025_usd desc", "market"),
    Preset::new("Adjacent markets", "adjacent_markets | sort by year asc", "market"),
    Preset::new("$100M+ rounds", "funding | where amount_usd > 100000000 | sort by amount_usd desc", "market"),
    Preset::new("Gov grants", "grants | sort by total_usd desc", "market"),
    Preset::new("Acquisitions", "acquisitions | sort by price_usd_estimate desc", "market"),
    Preset::new("All sources", "sources | sort by category asc", "market"),
    Preset::new("TAM/SAM/SOM", "tam_sam_som | sort by year asc", "analysis"),
    Preset::new("SOM projection", "tam_sam_som | where som_M > 0 | project year, bci_market_B, tam_M, sam_M, som_M", "analysis"),
    Preset::new("Convergence timeline", "convergence | sort by year asc", "analysis"),
    Preset::new("Auto vs BCI", "convergence | where market contains \"Automotive\" | sort by year asc", "analysis"),
    Preset::new("Investment momentum", "momentum | sort by year asc", "analysis"),
    Preset::new("Risk profile", "risk_profile | sort by risk_index desc", "analysis"),
    Preset::new("Highest risk", "risk_profile | where risk_index > 1 | project company, funding_B, devices, security_posture, risk_index", "analysis"),
    Preset::new("Zero security + funded", "risk_profile | where security_score == \"0/4\" | where funding_B > 0 | sort by funding_B desc", "analysis"),
    Preset::new("All funding rounds", "funding | sort by date desc", "investors"),
    Preset::new("Cross-portfolio VCs", "cross_portfolio | sort by bci_bet_count desc", "investors"),
    Preset::new("Sovereign wealth", "sovereign_funds", "investors"),
    Preset::new("Big Tech in BCI", "big_tech_bci", "investors"),
    Preset::new("PE firms", "pe_firms", "investors"),
    Preset::new("Intel/Defense", "intel_defense", "investors"),
    Preset::new("Notable individuals", "notable_investors", "investors"),
    Preset::new("Investment patterns", "investment_patterns", "investors"),
    Preset::new("$100M+ rounds", "funding | where amount_usd > 100000000 | sort by amount_usd desc", "investors"),
    Preset::new("By company category", "companies | summarize count() by category", "investors"),
    Preset::new("Growth stage cos", "companies | where category == \"growth_stage\" | sort by funding_total_usd desc", "investors"),
    Preset::new("Startups", "companies | where category == \"startup\" | sort by funding_total_usd desc", "investors"),
    Preset::new("Publications", "publications | sort by year desc", "market"),
    Preset::new("Validations", "validations | sort by date desc", "ops"),
    Preset::new("Automations", "automations | where status == \"active\"", "ops"),
    Preset::new("Milestones", "milestones | sort by date desc | take 20", "ops"),
    Preset::new("Latest news", "news | sort by date desc | take 20", "ops"),
    Preset::new("Latest intel", "intel_feed | sort by date desc | take 50", "intel"),
    Preset::new("Funding news", "intel_feed | where tags contains \"funding\" | sort by date desc", "intel"),
    Preset::new("Regulatory news", "intel_feed | where tags contains \"regulatory\" | sort by date desc", "intel"),
    Preset::new("Product launches", "intel_feed | where tags contains \"product\" | sort by date desc", "intel"),
    Preset::new("Policy updates", "intel_feed | where tags contains \"policy\" | sort by date desc", "intel"),
    Preset::new("Research papers", "intel_feed | where tags contains \"research\" | sort by date desc", "intel"),
    Preset::new("Intel by source", "intel_feed | summarize count() by source | sort by count desc", "intel"),
    Preset::new("Intel by company", "intel_feed | where companies != \"\" | summarize count() by companies", "intel"),
    Preset::new("Intel by tag", "intel_feed | summarize count() by tags", "intel"),
    Preset::new("All sources (200+)", "intel_sources | sort by category asc", "intel"),
    Preset::new("Free RSS sources", "intel_sources | where tier == \"free_rss\"", "intel"),
    Preset::new("Paid platforms", "intel_sources | where tier == \"paid\"", "intel"),
];

/// Presets in `group`, in catalog order. Group names match case-insensitively.
pub fn presets_in(group: &str) -> Vec<&'static Preset> {
    PRESETS
        .iter()
        .filter(|p| p.group.eq_ignore_ascii_case(group))
        .collect()
}

/// Distinct group names in first-seen order.
pub fn groups() -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    for p in &PRESETS {
        if !out.contains(&p.group) {
            out.push(p.group);
        }
    }
    out
}
