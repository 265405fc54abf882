//! Bundle presets selecting which deliverables the model is asked for.

/// Named preset mapped to fixed generation instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bundle {
    LandingEmail,
    AdsPack,
    OfferPricing,
    OutreachPack,
    Custom,
}

impl Bundle {
    pub const ALL: [Bundle; 5] = [
        Bundle::LandingEmail,
        Bundle::AdsPack,
        Bundle::OfferPricing,
        Bundle::OutreachPack,
        Bundle::Custom,
    ];

    /// Resolve a bundle identifier; unknown identifiers use the custom preset.
    pub fn resolve(tag: &str) -> Bundle {
        Self::ALL
            .into_iter()
            .find(|bundle| bundle.tag() == tag)
            .unwrap_or(Bundle::Custom)
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::LandingEmail => "landing_email",
            Self::AdsPack => "ads_pack",
            Self::OfferPricing => "offer_pricing",
            Self::OutreachPack => "outreach_pack",
            Self::Custom => "custom",
        }
    }

    pub fn instructions(self) -> &'static str {
        match self {
            Self::LandingEmail => "Generate a landing page + email funnel bundle.",
            Self::AdsPack => {
                "Generate an ads pack with TikTok hooks, Meta ads, and Google keywords."
            }
            Self::OfferPricing => "Generate offer and pricing page copy.",
            Self::OutreachPack => "Generate an outreach pack with cold emails and LinkedIn DMs.",
            Self::Custom => "Generate custom deliverables based on the user's specific request.",
        }
    }
}

impl std::fmt::Display for Bundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}
