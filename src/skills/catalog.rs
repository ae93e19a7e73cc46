//! Fixed vocabularies offered by the interests step.

use crate::form::model::RoleLane;

/// Startup domains a candidate can pick (1 to 3).
pub const DOMAIN_OPTIONS: &[&str] = &[
    "Fintech",
    "AI/ML",
    "Developer Tools",
    "Data Infrastructure",
    "Security",
    "Climate",
    "Health",
    "Robotics",
    "B2B SaaS",
    "Consumer",
    "Crypto/Web3",
    "Deep Tech",
];

/// Skills that are not specific to any role lane.
pub const GLOBAL_SKILLS: &[&str] = &[
    "Rust", "C#", "Kotlin", "Swift", "React", "Next.js", "Django", "Flask", "FastAPI", "Spring",
    ".NET", "Rails", "MySQL", "SQLite", "MongoDB", "RabbitMQ", "GraphQL", "WebSockets",
    "Snowflake", "BigQuery", "Databricks", "Pandas", "NumPy", "Hugging Face", "LangChain", "Ray",
    "Git", "Bash",
];

/// Predefined skills for a role lane, most relevant first.
pub fn role_skills(lane: RoleLane) -> &'static [&'static str] {
    match lane {
        RoleLane::BackendSwe => &[
            "Python", "Go", "Java", "TypeScript", "Node.js", "REST", "gRPC", "PostgreSQL",
            "Redis", "AWS", "GCP", "Azure", "Docker", "Kubernetes", "Terraform", "CI/CD",
            "GitHub Actions",
        ],
        RoleLane::MlPlatform => &[
            "Python", "PyTorch", "TensorFlow", "JAX", "Airflow", "MLflow", "Kubeflow", "Ray",
            "Spark", "Feature Store", "ONNX", "SageMaker", "Vertex AI", "Docker", "Kubernetes",
            "AWS",
        ],
        RoleLane::DataEng => &[
            "Python", "SQL (Advanced)", "dbt", "Airflow", "Spark", "Kafka", "Snowflake",
            "BigQuery", "Databricks", "PostgreSQL", "ETL/ELT", "Orchestration",
        ],
        RoleLane::PlatformSre => &[
            "Linux", "AWS", "GCP", "Azure", "Kubernetes", "Helm", "Terraform", "Prometheus",
            "Grafana", "Networking", "CDNs", "Incident Response", "Observability", "CI/CD",
        ],
        RoleLane::SolutionsEng => &[
            "APIs", "Auth/OAuth", "Webhooks", "Postman", "JavaScript", "Python", "SQL",
            "Integrations", "Demoing", "Customer Comms",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_lane_has_skills() {
        for lane in RoleLane::ALL {
            assert!(!role_skills(lane).is_empty(), "{lane}");
        }
    }

    #[test]
    fn vocabularies_fit_the_tag_length_bounds() {
        let all = RoleLane::ALL
            .into_iter()
            .flat_map(role_skills)
            .chain(GLOBAL_SKILLS);
        for skill in all {
            let len = skill.chars().count();
            assert!((2..=20).contains(&len), "{skill}");
        }
    }
}
