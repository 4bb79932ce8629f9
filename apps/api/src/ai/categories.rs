//! Built-in resume categories: guidance bullets and the keywords the
//! recommendation heuristic looks for.

pub const DEFAULT_CATEGORY: &str = "General";

pub struct CategoryProfile {
    pub name: &'static str,
    pub guidance: [&'static str; 5],
    pub keywords: &'static [&'static str],
}

pub const CATEGORIES: &[CategoryProfile] = &[
    CategoryProfile {
        name: "General",
        guidance: [
            "Write a focused 2-3 line summary with role, years of experience, and top domain expertise.",
            "Keep experience bullets impact-first: action + scope + measurable result.",
            "Prioritize recent and relevant projects with clear ownership and outcomes.",
            "Include technical stack with depth, not just tool names.",
            "Add links: LinkedIn, GitHub/portfolio, and relevant project demos.",
        ],
        keywords: &["impact", "results", "collaboration", "ownership", "projects"],
    },
    CategoryProfile {
        name: "Software Engineering",
        guidance: [
            "Show system design impact: scale, performance, reliability, and architecture decisions.",
            "Include quantifiable metrics such as latency reduction, uptime improvement, or cost savings.",
            "Highlight ownership across design, implementation, testing, rollout, and monitoring.",
            "Call out collaboration with product/design and cross-team execution.",
            "List core strengths such as APIs, distributed systems, and data modeling.",
        ],
        keywords: &["architecture", "api", "scalable", "performance", "reliability"],
    },
    CategoryProfile {
        name: "Frontend",
        guidance: [
            "Show UI impact with metrics: conversion, engagement, accessibility, and performance.",
            "Highlight component architecture, state management, and design system contributions.",
            "Add examples of cross-browser support and responsive implementation quality.",
            "Mention frontend testing strategy: unit, integration, and E2E coverage.",
            "Include modern tooling and optimization work (bundles, rendering, caching).",
        ],
        keywords: &["react", "ui", "ux", "accessibility", "frontend", "design system"],
    },
    CategoryProfile {
        name: "Backend",
        guidance: [
            "Emphasize APIs, data modeling, scalability, and reliability improvements.",
            "Provide concrete throughput/latency/error-rate metrics.",
            "Include security, observability, and incident-response contributions.",
            "Call out queueing, caching, and database optimization work.",
            "Show architecture ownership and migration experience.",
        ],
        keywords: &["api", "database", "backend", "microservices", "latency", "cache"],
    },
    CategoryProfile {
        name: "Full Stack",
        guidance: [
            "Present end-to-end ownership from UX flow to backend services and deployment.",
            "Connect product outcomes to technical implementation choices.",
            "Show balanced depth in frontend architecture and backend scalability.",
            "Highlight cross-functional delivery and fast iteration loops.",
            "Include 2-3 shipped features with measurable business impact.",
        ],
        keywords: &["frontend", "backend", "end-to-end", "product", "delivery"],
    },
    CategoryProfile {
        name: "Data Science",
        guidance: [
            "Describe business problem framing, hypothesis, and measurable impact.",
            "Include dataset size, methods used, and evaluation metrics.",
            "Highlight experimentation and A/B testing rigor.",
            "Show communication of insights to non-technical stakeholders.",
            "Mention productionization of models or analytics pipelines where relevant.",
        ],
        keywords: &["analysis", "model", "experiment", "statistics", "insight"],
    },
    CategoryProfile {
        name: "Machine Learning",
        guidance: [
            "List model objectives, constraints, and evaluation metrics clearly.",
            "Describe training/serving pipeline and MLOps practices.",
            "Highlight feature engineering and model iteration methodology.",
            "Include production impact: accuracy lift, false positive reduction, latency.",
            "Show collaboration with platform, product, and domain teams.",
        ],
        keywords: &["model", "training", "inference", "mlops", "feature engineering"],
    },
    CategoryProfile {
        name: "DevOps",
        guidance: [
            "Show infrastructure reliability gains: uptime, MTTR, deployment frequency.",
            "Highlight CI/CD pipelines, IaC, and release automation.",
            "Include observability stack and on-call improvements.",
            "Demonstrate cost optimization and cloud resource governance.",
            "Mention security and compliance automation where applicable.",
        ],
        keywords: &["ci/cd", "infrastructure", "deployment", "kubernetes", "monitoring"],
    },
    CategoryProfile {
        name: "Cloud",
        guidance: [
            "Focus on cloud architecture, migration strategy, and resiliency.",
            "Quantify availability, latency, and cost improvements.",
            "Include containerization, orchestration, and service networking.",
            "Show multi-environment deployment and infrastructure automation.",
            "Highlight governance, security controls, and disaster recovery.",
        ],
        keywords: &["aws", "gcp", "azure", "cloud", "scaling", "availability"],
    },
    CategoryProfile {
        name: "Cybersecurity",
        guidance: [
            "Highlight threat modeling, remediation, and risk reduction outcomes.",
            "Include security tooling, incident response, and vulnerability management.",
            "Show secure development lifecycle contributions.",
            "Demonstrate compliance controls and audit readiness support.",
            "Quantify impact with reduced incidents, improved detection, or faster response.",
        ],
        keywords: &["security", "vulnerability", "threat", "compliance", "incident"],
    },
    CategoryProfile {
        name: "Product Management",
        guidance: [
            "Lead with product outcomes and customer/business impact.",
            "Show prioritization frameworks and roadmap ownership.",
            "Include cross-functional execution with engineering and design.",
            "Highlight experiment-driven decisions and KPI movement.",
            "Show communication with stakeholders and tradeoff management.",
        ],
        keywords: &["roadmap", "stakeholder", "kpi", "prioritization", "customer"],
    },
    CategoryProfile {
        name: "UI/UX Design",
        guidance: [
            "Show user research inputs and how insights informed design decisions.",
            "Include usability outcomes and measurable UX improvements.",
            "Highlight design system and component library contributions.",
            "Show collaboration with product and engineering for shipped work.",
            "Add portfolio links with concise project context and outcomes.",
        ],
        keywords: &["wireframe", "prototype", "usability", "research", "design system"],
    },
    CategoryProfile {
        name: "QA / Testing",
        guidance: [
            "Show quality strategy across manual, automation, and regression coverage.",
            "Include defect leakage reduction and test-cycle efficiency gains.",
            "Highlight CI-integrated test automation and reliability practices.",
            "Mention risk-based planning and release confidence improvements.",
            "Show collaboration to improve definition of done and quality gates.",
        ],
        keywords: &["test automation", "regression", "qa", "quality", "defect"],
    },
    CategoryProfile {
        name: "Mobile Development",
        guidance: [
            "Emphasize app performance, crash-free sessions, and user retention metrics.",
            "Highlight platform expertise, release lifecycle, and store deployment.",
            "Include offline handling, synchronization, and device compatibility work.",
            "Show UX quality improvements and accessibility considerations.",
            "Mention analytics-driven iteration on user flows and engagement.",
        ],
        keywords: &["ios", "android", "mobile", "app store", "performance"],
    },
    CategoryProfile {
        name: "Internship",
        guidance: [
            "Keep bullets concise and impact-oriented even for short project timelines.",
            "Highlight learning speed, ownership, and shipped outcomes.",
            "Emphasize academic projects aligned to the target role.",
            "Show mentorship collaboration and code quality practices.",
            "Include skills actually used in production or major projects.",
        ],
        keywords: &["project", "learning", "collaboration", "impact", "delivery"],
    },
];

pub fn category_names() -> Vec<&'static str> {
    CATEGORIES.iter().map(|c| c.name).collect()
}

/// Case- and whitespace-insensitive lookup; unknown or missing names map to
/// [`DEFAULT_CATEGORY`].
pub fn resolve_category(value: Option<&str>) -> &'static CategoryProfile {
    let wanted = value.map(|v| v.trim().to_lowercase()).unwrap_or_default();
    CATEGORIES
        .iter()
        .find(|c| c.name.to_lowercase() == wanted)
        .unwrap_or(&CATEGORIES[0])
}
