//! Well known services and their price tiers.
//!
//! Choosing a tier on the new subscription page fills in the form with the
//! service name, cost, billing cycle and category. Prices are in the base
//! currency and are only a starting point, the user can edit them before saving.

use rust_decimal::Decimal;

use crate::{
    billing::BillingCycle::{self, Monthly, Yearly},
    category::Category,
};

/// One of the plans a service offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceTier {
    /// The plan name, e.g. "Premium".
    pub name: &'static str,
    cost_cents: i64,
    /// How often the plan charges.
    pub billing_cycle: BillingCycle,
}

impl PriceTier {
    /// The cost per billing period in the base currency.
    pub fn cost(&self) -> Decimal {
        Decimal::new(self.cost_cents, 2)
    }
}

/// A well known subscription service.
#[derive(Debug, PartialEq, Eq)]
pub struct PopularService {
    /// A URL friendly identifier, e.g. "disney-plus".
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    /// The plans on offer, in the order the service lists them.
    pub tiers: &'static [PriceTier],
    default_tier: usize,
}

impl PopularService {
    /// The tier at `index`, falling back to the service's most common tier
    /// when `index` is missing or out of range.
    pub fn tier_or_default(&self, index: Option<usize>) -> Option<(usize, &'static PriceTier)> {
        let index = index
            .filter(|&index| index < self.tiers.len())
            .unwrap_or(self.default_tier);

        self.tiers.get(index).map(|tier| (index, tier))
    }
}

const fn tier(name: &'static str, cost_cents: i64, billing_cycle: BillingCycle) -> PriceTier {
    PriceTier {
        name,
        cost_cents,
        billing_cycle,
    }
}

/// The services shown first on the new subscription page.
const FEATURED_SERVICE_IDS: [&str; 8] = [
    "netflix",
    "spotify",
    "disney-plus",
    "apple-music",
    "max",
    "prime-video",
    "youtube-music",
    "adobe-creative-cloud",
];

/// Every service in the catalogue.
pub static POPULAR_SERVICES: [PopularService; 48] = [
    PopularService {
        id: "netflix",
        name: "Netflix",
        category: Category::Streaming,
        tiers: &[
            tier("Standard with Ads", 699, Monthly),
            tier("Standard", 1549, Monthly),
            tier("Premium", 2299, Monthly),
        ],
        default_tier: 1,
    },
    PopularService {
        id: "disney-plus",
        name: "Disney+",
        category: Category::Streaming,
        tiers: &[
            tier("Basic with Ads", 799, Monthly),
            tier("Premium", 1399, Monthly),
            tier("Premium Annual", 13999, Yearly),
        ],
        default_tier: 1,
    },
    PopularService {
        id: "hulu",
        name: "Hulu",
        category: Category::Streaming,
        tiers: &[
            tier("With Ads", 799, Monthly),
            tier("No Ads", 1799, Monthly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "prime-video",
        name: "Prime Video",
        category: Category::Streaming,
        tiers: &[
            tier("With Ads", 899, Monthly),
            tier("Ad-Free", 1199, Monthly),
            tier("Prime Monthly", 1499, Monthly),
            tier("Prime Annual", 13900, Yearly),
        ],
        default_tier: 2,
    },
    PopularService {
        id: "max",
        name: "Max",
        category: Category::Streaming,
        tiers: &[
            tier("With Ads", 999, Monthly),
            tier("Ad-Free", 1699, Monthly),
            tier("Ultimate", 2099, Monthly),
        ],
        default_tier: 1,
    },
    PopularService {
        id: "apple-tv-plus",
        name: "Apple TV+",
        category: Category::Streaming,
        tiers: &[
            tier("Monthly", 999, Monthly),
            tier("Annual", 9900, Yearly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "paramount-plus",
        name: "Paramount+",
        category: Category::Streaming,
        tiers: &[
            tier("Essential", 799, Monthly),
            tier("With Showtime", 1299, Monthly),
            tier("Annual", 5999, Yearly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "peacock",
        name: "Peacock",
        category: Category::Streaming,
        tiers: &[
            tier("Premium", 799, Monthly),
            tier("Premium Plus", 1399, Monthly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "youtube-premium",
        name: "YouTube Premium",
        category: Category::Streaming,
        tiers: &[
            tier("Individual", 1399, Monthly),
            tier("Family", 2299, Monthly),
            tier("Student", 799, Monthly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "crunchyroll",
        name: "Crunchyroll",
        category: Category::Streaming,
        tiers: &[
            tier("Fan", 799, Monthly),
            tier("Mega Fan", 999, Monthly),
            tier("Ultimate Fan", 1499, Monthly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "discovery-plus",
        name: "Discovery+",
        category: Category::Streaming,
        tiers: &[
            tier("With Ads", 499, Monthly),
            tier("Ad-Free", 899, Monthly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "espn-plus",
        name: "ESPN+",
        category: Category::Streaming,
        tiers: &[
            tier("Monthly", 1099, Monthly),
            tier("Annual", 10999, Yearly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "starz",
        name: "Starz",
        category: Category::Streaming,
        tiers: &[
            tier("Monthly", 999, Monthly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "showtime",
        name: "Showtime",
        category: Category::Streaming,
        tiers: &[
            tier("Monthly", 1099, Monthly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "mgm-plus",
        name: "MGM+",
        category: Category::Streaming,
        tiers: &[
            tier("Monthly", 699, Monthly),
            tier("Annual", 4999, Yearly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "spotify",
        name: "Spotify",
        category: Category::Music,
        tiers: &[
            tier("Individual", 1199, Monthly),
            tier("Duo", 1699, Monthly),
            tier("Family", 1999, Monthly),
            tier("Student", 599, Monthly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "apple-music",
        name: "Apple Music",
        category: Category::Music,
        tiers: &[
            tier("Voice", 499, Monthly),
            tier("Individual", 1099, Monthly),
            tier("Family", 1699, Monthly),
            tier("Student", 599, Monthly),
        ],
        default_tier: 1,
    },
    PopularService {
        id: "youtube-music",
        name: "YouTube Music",
        category: Category::Music,
        tiers: &[
            tier("Individual", 1099, Monthly),
            tier("Family", 1699, Monthly),
            tier("Student", 549, Monthly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "amazon-music",
        name: "Amazon Music",
        category: Category::Music,
        tiers: &[
            tier("Unlimited", 999, Monthly),
            tier("Family", 1599, Monthly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "tidal",
        name: "Tidal",
        category: Category::Music,
        tiers: &[
            tier("HiFi", 1099, Monthly),
            tier("HiFi Plus", 1999, Monthly),
            tier("Family", 1699, Monthly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "microsoft-365",
        name: "Microsoft 365",
        category: Category::Productivity,
        tiers: &[
            tier("Personal Monthly", 699, Monthly),
            tier("Personal Annual", 6999, Yearly),
            tier("Family Monthly", 999, Monthly),
            tier("Family Annual", 9999, Yearly),
        ],
        default_tier: 1,
    },
    PopularService {
        id: "adobe-creative-cloud",
        name: "Adobe Creative Cloud",
        category: Category::Productivity,
        tiers: &[
            tier("Photography", 999, Monthly),
            tier("Single App", 2299, Monthly),
            tier("All Apps", 5999, Monthly),
            tier("Student All Apps", 1999, Monthly),
        ],
        default_tier: 2,
    },
    PopularService {
        id: "google-one",
        name: "Google One",
        category: Category::Productivity,
        tiers: &[
            tier("100 GB", 199, Monthly),
            tier("200 GB", 299, Monthly),
            tier("2 TB", 999, Monthly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "dropbox",
        name: "Dropbox",
        category: Category::Productivity,
        tiers: &[
            tier("Plus", 1199, Monthly),
            tier("Professional", 1999, Monthly),
            tier("Plus Annual", 11988, Yearly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "notion",
        name: "Notion",
        category: Category::Productivity,
        tiers: &[
            tier("Plus", 1000, Monthly),
            tier("Business", 1800, Monthly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "evernote",
        name: "Evernote",
        category: Category::Productivity,
        tiers: &[
            tier("Personal", 1099, Monthly),
            tier("Professional", 1499, Monthly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "1password",
        name: "1Password",
        category: Category::Productivity,
        tiers: &[
            tier("Individual", 299, Monthly),
            tier("Families", 499, Monthly),
            tier("Individual Annual", 3588, Yearly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "canva-pro",
        name: "Canva Pro",
        category: Category::Productivity,
        tiers: &[
            tier("Monthly", 1299, Monthly),
            tier("Annual", 11999, Yearly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "xbox-game-pass",
        name: "Xbox Game Pass",
        category: Category::Gaming,
        tiers: &[
            tier("Core", 999, Monthly),
            tier("Standard", 1499, Monthly),
            tier("Ultimate", 1999, Monthly),
        ],
        default_tier: 1,
    },
    PopularService {
        id: "playstation-plus",
        name: "PlayStation Plus",
        category: Category::Gaming,
        tiers: &[
            tier("Essential Monthly", 999, Monthly),
            tier("Extra Monthly", 1499, Monthly),
            tier("Premium Monthly", 1799, Monthly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "nintendo-switch-online",
        name: "Nintendo Switch Online",
        category: Category::Gaming,
        tiers: &[
            tier("Individual Monthly", 399, Monthly),
            tier("Individual Annual", 1999, Yearly),
            tier("Family Annual", 3499, Yearly),
            tier("Expansion Pack", 4999, Yearly),
        ],
        default_tier: 1,
    },
    PopularService {
        id: "ea-play",
        name: "EA Play",
        category: Category::Gaming,
        tiers: &[
            tier("Monthly", 599, Monthly),
            tier("Annual", 3999, Yearly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "geforce-now",
        name: "GeForce Now",
        category: Category::Gaming,
        tiers: &[
            tier("Priority", 999, Monthly),
            tier("Ultimate", 1999, Monthly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "new-york-times",
        name: "New York Times",
        category: Category::News,
        tiers: &[
            tier("Basic Digital", 1700, Monthly),
            tier("All Access", 2500, Monthly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "wall-street-journal",
        name: "Wall Street Journal",
        category: Category::News,
        tiers: &[
            tier("Digital", 1299, Monthly),
            tier("Print + Digital", 3899, Monthly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "kindle-unlimited",
        name: "Kindle Unlimited",
        category: Category::News,
        tiers: &[
            tier("Monthly", 1199, Monthly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "audible",
        name: "Audible",
        category: Category::News,
        tiers: &[
            tier("Plus", 795, Monthly),
            tier("Premium Plus", 1495, Monthly),
        ],
        default_tier: 1,
    },
    PopularService {
        id: "medium",
        name: "Medium",
        category: Category::News,
        tiers: &[
            tier("Monthly", 500, Monthly),
            tier("Annual", 5000, Yearly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "peloton",
        name: "Peloton",
        category: Category::Fitness,
        tiers: &[
            tier("App", 1299, Monthly),
            tier("All-Access", 4400, Monthly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "apple-fitness-plus",
        name: "Apple Fitness+",
        category: Category::Fitness,
        tiers: &[
            tier("Monthly", 999, Monthly),
            tier("Annual", 7999, Yearly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "strava",
        name: "Strava",
        category: Category::Fitness,
        tiers: &[
            tier("Monthly", 1199, Monthly),
            tier("Annual", 7999, Yearly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "headspace",
        name: "Headspace",
        category: Category::Fitness,
        tiers: &[
            tier("Monthly", 1299, Monthly),
            tier("Annual", 6999, Yearly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "calm",
        name: "Calm",
        category: Category::Fitness,
        tiers: &[
            tier("Monthly", 1499, Monthly),
            tier("Annual", 6999, Yearly),
            tier("Lifetime", 39999, Yearly),
        ],
        default_tier: 1,
    },
    PopularService {
        id: "icloud-plus",
        name: "iCloud+",
        category: Category::Cloud,
        tiers: &[
            tier("50 GB", 99, Monthly),
            tier("200 GB", 299, Monthly),
            tier("2 TB", 999, Monthly),
            tier("6 TB", 2999, Monthly),
            tier("12 TB", 5999, Monthly),
        ],
        default_tier: 1,
    },
    PopularService {
        id: "onedrive",
        name: "OneDrive",
        category: Category::Cloud,
        tiers: &[
            tier("100 GB", 199, Monthly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "linkedin-premium",
        name: "LinkedIn Premium",
        category: Category::Other,
        tiers: &[
            tier("Career", 2999, Monthly),
            tier("Business", 5999, Monthly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "duolingo-plus",
        name: "Duolingo Plus",
        category: Category::Education,
        tiers: &[
            tier("Super", 699, Monthly),
            tier("Super Annual", 8399, Yearly),
            tier("Family", 11999, Yearly),
        ],
        default_tier: 0,
    },
    PopularService {
        id: "chatgpt-plus",
        name: "ChatGPT Plus",
        category: Category::Productivity,
        tiers: &[
            tier("Plus", 2000, Monthly),
            tier("Pro", 20000, Monthly),
        ],
        default_tier: 0,
    },
];

/// Look up a service by its [PopularService::id].
pub fn find_service(id: &str) -> Option<&'static PopularService> {
    POPULAR_SERVICES.iter().find(|service| service.id == id)
}

/// The most popular services, in display order.
pub fn featured_services() -> impl Iterator<Item = &'static PopularService> {
    FEATURED_SERVICE_IDS.iter().filter_map(|id| find_service(id))
}

/// The services in `category`, in catalogue order.
pub fn services_in(category: Category) -> impl Iterator<Item = &'static PopularService> {
    POPULAR_SERVICES
        .iter()
        .filter(move |service| service.category == category)
}
