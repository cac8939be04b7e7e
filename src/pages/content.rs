// Static copy for the landing page.

pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

pub struct Package {
    pub name: &'static str,
    pub price: &'static str,
    pub blurb: &'static str,
    pub features: &'static [&'static str],
    pub popular: bool,
}

pub struct Client {
    pub name: &'static str,
    pub logo: &'static str,
}

pub struct Testimonial {
    pub quote: &'static str,
    pub author: &'static str,
    pub role: &'static str,
}

pub const NAV_LINKS: &[NavLink] = &[
    NavLink { label: "About", href: "#about" },
    NavLink { label: "Packages", href: "#packages" },
    NavLink { label: "Clients", href: "#clients" },
    NavLink { label: "Contact", href: "#contact" },
];

pub const PACKAGES: &[Package] = &[
    Package {
        name: "Starter",
        price: "€290",
        blurb: "One track, mixed and mastered.",
        features: &["1 song mix", "Mastering for streaming", "2 revision rounds"],
        popular: false,
    },
    Package {
        name: "Riddim",
        price: "€790",
        blurb: "An EP that sounds like one record.",
        features: &["Up to 4 songs", "Stem mastering", "Vocal tuning", "Unlimited revisions"],
        popular: true,
    },
    Package {
        name: "Sound System",
        price: "€1 490",
        blurb: "Full production from demo to release.",
        features: &["Arrangement and production", "Session musicians", "Mix and master", "Release assets"],
        popular: false,
    },
];

pub const CLIENTS: &[Client] = &[
    Client { name: "Kingston Heights", logo: "/assets/clients/kingston-heights.svg" },
    Client { name: "Dub Foundry", logo: "/assets/clients/dub-foundry.svg" },
    Client { name: "Bass Culture", logo: "/assets/clients/bass-culture.svg" },
    Client { name: "Island Frequency", logo: "/assets/clients/island-frequency.svg" },
    Client { name: "Yard Tapes", logo: "/assets/clients/yard-tapes.svg" },
    Client { name: "Night Skank", logo: "/assets/clients/night-skank.svg" },
];

pub const TESTIMONIALS: &[Testimonial] = &[
    Testimonial {
        quote: "The low end finally hits on every system we play.",
        author: "Marcia L.",
        role: "Selector, Bass Culture",
    },
    Testimonial {
        quote: "Fast turnaround and the vocals sit exactly where they should.",
        author: "Devon R.",
        role: "Artist",
    },
];
