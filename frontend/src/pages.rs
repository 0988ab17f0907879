//! Static information pages.

use console::style;

use crate::ui::{heading, title};

pub struct Section {
    pub heading: &'static str,
    pub lines: &'static [&'static str],
}

pub struct Page {
    pub title: &'static str,
    pub intro: &'static str,
    pub sections: &'static [Section],
}

pub const HOW_IT_WORKS: Page = Page {
    title: "How HomieFixie Works",
    intro: "Get expert home improvement guidance in three simple steps.",
    sections: &[
        Section {
            heading: "1. Describe Your Project",
            lines: &[
                "Describe what you need help with, from a leaky faucet to a new light fixture.",
                "You can also attach a photo so the analysis can see your situation.",
                "Examples: \"Caulk around bathtub is peeling\", \"Want to install a ceiling fan\".",
            ],
        },
        Section {
            heading: "2. AI Analysis",
            lines: &[
                "Your description and photo are analyzed to find the materials, tools and steps",
                "your project needs. Longer descriptions may get a few clarifying questions first.",
            ],
        },
        Section {
            heading: "3. Get Your Complete Solution",
            lines: &[
                "You get a shopping list with prices, required tools, step-by-step instructions,",
                "safety notes and video tutorials.",
            ],
        },
        Section {
            heading: "What Makes HomieFixie Special",
            lines: &[
                "Instant results in seconds.",
                "Guidance grounded in professional trade knowledge.",
                "Know exactly what to buy before you go to the store.",
                "Safety notes for every plan.",
            ],
        },
    ],
};

pub const CONTACT: Page = Page {
    title: "Contact Us",
    intro: "We'd love to hear from you.",
    sections: &[
        Section {
            heading: "Feedback on a plan",
            lines: &["Use the helpful / not helpful options shown under every result."],
        },
        Section {
            heading: "Privacy questions",
            lines: &["Email privacy@homiefixie.com with the subject \"Privacy Policy Inquiry\"."],
        },
    ],
};

pub const PRIVACY: Page = Page {
    title: "Privacy Policy",
    intro: "HomieFixie is committed to protecting your privacy. This policy explains what we \
            collect and how we use it when you use our home improvement assistance service.",
    sections: &[
        Section {
            heading: "Information We Collect",
            lines: &[
                "Project descriptions you submit.",
                "Photos you choose to upload (optional).",
                "Your email address, if you choose to provide it.",
                "Usage and device information such as pages visited and browser type.",
            ],
        },
        Section {
            heading: "How We Use Information",
            lines: &[
                "To analyze your project and generate recommendations.",
                "To improve our models using anonymized data.",
                "To answer support requests and keep the service secure.",
            ],
        },
        Section {
            heading: "Data Sharing",
            lines: &[
                "We do not sell or trade your personal information. It is shared only with service",
                "providers that operate the service, when required by law, or to protect safety.",
            ],
        },
        Section {
            heading: "Data Retention",
            lines: &[
                "Project data is stored for up to 30 days.",
                "Images are deleted after analysis completes.",
                "Aggregated, anonymized analytics may be kept indefinitely.",
            ],
        },
        Section {
            heading: "Your Rights",
            lines: &[
                "You may request access to, correction of, deletion of, or a copy of your data.",
            ],
        },
        Section {
            heading: "Children's Privacy",
            lines: &["The service is not intended for children under 13."],
        },
        Section {
            heading: "Contact",
            lines: &["privacy@homiefixie.com (Subject: Privacy Policy Inquiry)"],
        },
    ],
};

pub const DISCLAIMER: Page = Page {
    title: "Disclaimer",
    intro: "The home repair analysis provided by this service is for informational purposes \
            only and should not be considered professional advice.",
    sections: &[
        Section {
            heading: "AI Limitations",
            lines: &[
                "Analysis is based on the limited information you provide.",
                "Recommendations may not account for local building codes or regulations.",
                "Complex or structural issues require professional inspection.",
                "Safety considerations may not be comprehensive for every scenario.",
            ],
        },
        Section {
            heading: "Professional Consultation",
            lines: &[
                "For structural, electrical, plumbing or gas work, consult licensed professionals.",
            ],
        },
        Section {
            heading: "No Warranty",
            lines: &[
                "This service is provided \"as is\" without warranties of any kind. We are not liable",
                "for damages arising from use of the service or reliance on its recommendations.",
            ],
        },
    ],
};

pub const ABOUT: Page = Page {
    title: "About HomieFixie",
    intro: "Empowering homeowners with AI-powered guidance backed by professional expertise.",
    sections: &[
        Section {
            heading: "Our Mission",
            lines: &[
                "Every homeowner deserves access to professional-grade home improvement guidance,",
                "whether it is their first repair or their fiftieth.",
            ],
        },
        Section {
            heading: "Built on Professional Expertise",
            lines: &["Electrical systems, plumbing, structural work and finishing."],
        },
        Section {
            heading: "Important Limitations",
            lines: &[
                "AI guidance is for informational purposes only.",
                "Always verify local building codes and permits.",
                "Electrical, plumbing and structural work may require licensed professionals.",
            ],
        },
        Section {
            heading: "Company Information",
            lines: &["Orange County, CA. Serving homeowners nationwide since 2025."],
        },
    ],
};

pub fn show(page: &Page) {
    title(page.title);
    println!("{}", page.intro);
    for section in page.sections {
        heading(section.heading);
        for line in section.lines {
            println!("  {}", line);
        }
    }
    println!();
    println!("{}", style("Run `homiefixie` to start a project.").dim());
}
