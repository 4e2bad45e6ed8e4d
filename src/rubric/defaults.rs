use super::{Rubric, RubricDimension};

struct Seed {
    id: &'static str,
    label: &'static str,
    description: &'static str,
    weight: f64,
    guidance: &'static str,
    keywords: &'static [&'static str],
    aliases: &'static [&'static str],
    missing_hint: &'static str,
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "problem",
        label: "Problem",
        description: "What specific problem the startup solves and how painful it is.",
        weight: 1.0,
        guidance: "90-100: a specific, painful, frequent problem with evidence people \
                   actively seek a fix. 50-70: real but vague or nice-to-have. Below 30: \
                   generic or unclear who hurts and why.",
        keywords: &[
            "problem*", "pain", "pain point*", "struggle*", "frustrat*", "waste*",
            "costly", "inefficien*", "challenge*", "broken", "hours", "tedious",
        ],
        aliases: &["the problem", "pain point", "pain points"],
        missing_hint: "State the problem in one or two sentences: who has it, how often, \
                       and what it costs them today.",
    },
    Seed {
        id: "customer",
        label: "Customer",
        description: "Who specifically experiences the problem (ideal customer profile).",
        weight: 0.75,
        guidance: "90-100: a narrow, reachable persona with buying power and a clear \
                   trigger. 50-70: a recognisable segment but broad. Below 30: \
                   'everyone' or no buyer identified.",
        keywords: &[
            "customer*", "client*", "buyer*", "persona*", "segment*", "target*",
            "ideal customer", "icp", "who we serve", "owners", "teams",
        ],
        aliases: &[
            "target customer", "target customers", "ideal customer profile", "icp",
            "customers", "who it is for",
        ],
        missing_hint: "Name the ideal customer: the role, company type and situation in \
                       which they feel the problem most.",
    },
    Seed {
        id: "solution",
        label: "Solution",
        description: "What the product is and how it solves the problem.",
        weight: 1.0,
        guidance: "90-100: a concrete product whose mechanism clearly removes the pain, \
                   with a believable insight. 50-70: plausible but generic. Below 30: \
                   buzzwords without a described product.",
        keywords: &[
            "solution*", "platform", "product", "app", "software", "tool*", "we built",
            "we build", "we help", "helps", "automat*", "our approach", "feature*",
        ],
        aliases: &["our solution", "product", "how it works"],
        missing_hint: "Describe the product and the one mechanism that makes the problem \
                       go away.",
    },
    Seed {
        id: "market",
        label: "Market",
        description: "How large the opportunity is and how it was sized.",
        weight: 1.0,
        guidance: "90-100: bottom-up sizing with a credible TAM/SAM/SOM and growth \
                   drivers. 50-70: a top-down figure with little reasoning. Below 20: \
                   no market sizing at all.",
        keywords: &[
            "market", "markets", "market size", "addressable", "tam", "sam", "som",
            "billion", "industry", "opportunity",
        ],
        aliases: &["market size", "market opportunity", "opportunity", "tam"],
        missing_hint: "No market sizing found: quantify the opportunity, e.g. total \
                       addressable market in dollars and how you reached that number.",
    },
    Seed {
        id: "competition",
        label: "Competition",
        description: "Direct and indirect alternatives and why this startup wins.",
        weight: 0.75,
        guidance: "90-100: names real competitors and substitutes with a defensible, \
                   specific advantage. 50-70: acknowledges competitors but the edge is \
                   thin. Below 30: claims there is no competition.",
        keywords: &[
            "competitor*", "competition", "competitive", "compete*", "alternative*",
            "incumbent*", "differentiat*", "unlike", "moat", "versus",
        ],
        aliases: &["competitors", "competitive landscape", "competitive advantage"],
        missing_hint: "List the main competitors or substitute behaviours and explain \
                       why customers will switch to you.",
    },
    Seed {
        id: "traction",
        label: "Traction",
        description: "Evidence of demand: users, revenue, pilots, growth.",
        weight: 1.0,
        guidance: "90-100: paying customers or strong retention with growth numbers. \
                   50-70: pilots, waitlists or early usage. Below 30: no evidence of \
                   demand yet.",
        keywords: &[
            "traction", "revenue", "mrr", "arr", "growth", "growing", "grew", "pilot*",
            "paying", "signed", "retention", "waitlist", "users", "loi*",
        ],
        aliases: &["progress", "milestones", "metrics"],
        missing_hint: "Share any evidence of demand: users, pilots, letters of intent or \
                       revenue, with numbers.",
    },
    Seed {
        id: "ask",
        label: "Ask",
        description: "What the founder is asking for and how it will be used.",
        weight: 0.5,
        guidance: "90-100: a specific amount, instrument and milestone-based use of \
                   funds. 50-70: an amount without a plan. Below 30: no clear ask.",
        keywords: &[
            "raising", "raise", "funding", "investment", "investor*", "seed", "round",
            "runway", "use of funds", "seeking", "valuation",
        ],
        aliases: &["the ask", "funding", "fundraising", "investment"],
        missing_hint: "Close with the ask: how much you are raising and which milestones \
                       the money gets you to.",
    },
];

/// Built-in rubric used when the config does not declare one.
pub fn default_rubric() -> Rubric {
    let dimensions = SEEDS
        .iter()
        .map(|seed| RubricDimension {
            id: seed.id.to_string(),
            label: seed.label.to_string(),
            description: seed.description.to_string(),
            weight: seed.weight,
            guidance: collapse_whitespace(seed.guidance),
            keywords: seed.keywords.iter().map(|k| (*k).to_string()).collect(),
            aliases: seed.aliases.iter().map(|a| (*a).to_string()).collect(),
            missing_hint: collapse_whitespace(seed.missing_hint),
        })
        .collect();

    // Seed table validity is asserted in tests.
    Rubric { dimensions }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
