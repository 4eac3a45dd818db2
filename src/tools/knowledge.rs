//! Knowledge base lookup
//!
//! A small in-memory table of research notes. Read-only, no side effects.

use serde::Serialize;
use serde_json::{json, Value};

/// Research notes for one topic
#[derive(Debug, Serialize)]
pub struct KnowledgeEntry {
    pub title: &'static str,
    pub key_points: &'static [&'static str],
    pub examples: &'static [&'static str],
    pub common_pitfalls: &'static [&'static str],
}

/// Entries in lookup order; partial matches take the first hit.
pub static KNOWLEDGE_BASE: &[(&str, KnowledgeEntry)] = &[
    (
        "python_asyncio",
        KnowledgeEntry {
            title: "Python Asyncio Basics",
            key_points: &[
                "asyncio is Python's built-in library for writing concurrent code using async/await syntax",
                "async def defines a coroutine function that can be awaited",
                "await keyword pauses execution until the awaited operation completes",
                "asyncio.run() is the entry point to run async programs",
                "Useful for I/O-bound operations like network requests, file operations",
                "Not helpful for CPU-bound tasks (use multiprocessing instead)",
            ],
            examples: &[
                "async def fetch_data():\n    await asyncio.sleep(1)\n    return 'data'",
                "asyncio.run(main())",
            ],
            common_pitfalls: &[
                "Forgetting to await a coroutine",
                "Mixing blocking and non-blocking code",
                "Not using asyncio-compatible libraries",
            ],
        },
    ),
    (
        "autogen_agents",
        KnowledgeEntry {
            title: "AutoGen Multi-Agent Systems",
            key_points: &[
                "AutoGen enables building conversational multi-agent systems",
                "Each agent has a role, system message, and optional tools",
                "GroupChat orchestrates turn-taking between agents",
                "Agents can be Assistants (LLM-powered) or UserProxyAgents (human/code executors)",
                "Tool calling allows agents to invoke Python functions",
                "Human-in-the-loop patterns enhance safety and control",
            ],
            examples: &[
                "AssistantAgent for planning and reasoning",
                "UserProxyAgent for executing code and human input",
            ],
            common_pitfalls: &[
                "Too many agents causing confusion",
                "Unclear system messages leading to poor coordination",
                "No maximum round limits causing infinite loops",
            ],
        },
    ),
    (
        "machine_learning",
        KnowledgeEntry {
            title: "Machine Learning Fundamentals",
            key_points: &[
                "ML is a subset of AI focused on learning from data",
                "Supervised learning uses labeled data (classification, regression)",
                "Unsupervised learning finds patterns in unlabeled data (clustering)",
                "Features are input variables, labels are outputs",
                "Training involves optimizing model parameters to minimize error",
                "Evaluation uses metrics like accuracy, precision, recall, F1-score",
            ],
            examples: &[
                "Linear regression for price prediction",
                "Decision trees for classification",
                "K-means for customer segmentation",
            ],
            common_pitfalls: &[
                "Overfitting to training data",
                "Insufficient or biased training data",
                "Not preprocessing or normalizing features",
            ],
        },
    ),
    (
        "api_design",
        KnowledgeEntry {
            title: "RESTful API Design Best Practices",
            key_points: &[
                "REST uses HTTP methods: GET (read), POST (create), PUT/PATCH (update), DELETE",
                "Resources are nouns in URLs (e.g., /users, /posts)",
                "Status codes communicate outcomes (200 OK, 404 Not Found, 500 Error)",
                "Versioning ensures backward compatibility (e.g., /v1/users)",
                "Authentication via tokens (JWT, OAuth)",
                "Pagination for large datasets",
            ],
            examples: &[
                "GET /api/v1/users?page=1&limit=20",
                "POST /api/v1/users with JSON body",
                "PUT /api/v1/users/123 to update user",
            ],
            common_pitfalls: &[
                "Using verbs in URLs (e.g., /getUser)",
                "Inconsistent naming conventions",
                "Exposing internal implementation details",
            ],
        },
    ),
    (
        "docker_basics",
        KnowledgeEntry {
            title: "Docker Containerization Basics",
            key_points: &[
                "Docker packages applications with dependencies into containers",
                "Containers are lightweight, portable, and isolated",
                "Dockerfile defines the container image",
                "Images are built from Dockerfiles, containers run from images",
                "docker-compose orchestrates multi-container applications",
                "Volumes persist data outside containers",
            ],
            examples: &[
                "FROM python:3.10\nCOPY . /app\nRUN pip install -r requirements.txt",
                "docker build -t myapp .",
                "docker run -p 8000:8000 myapp",
            ],
            common_pitfalls: &[
                "Large image sizes due to unnecessary layers",
                "Running containers as root user",
                "Not using .dockerignore to exclude files",
            ],
        },
    ),
];

/// Lowercase, with spaces and hyphens folded to underscores
pub fn normalize_topic(topic: &str) -> String {
    topic.to_lowercase().replace([' ', '-'], "_")
}

/// Keys of every topic, in table order
pub fn available_topics() -> Vec<&'static str> {
    KNOWLEDGE_BASE.iter().map(|(key, _)| *key).collect()
}

/// Find the entry for a topic: exact key first, then the first key that
/// contains or is contained by the normalized topic.
pub fn find_entry(topic: &str) -> Option<&'static KnowledgeEntry> {
    let normalized = normalize_topic(topic);

    KNOWLEDGE_BASE
        .iter()
        .find(|(key, _)| *key == normalized)
        .or_else(|| {
            KNOWLEDGE_BASE
                .iter()
                .find(|(key, _)| key.contains(normalized.as_str()) || normalized.contains(key))
        })
        .map(|(_, entry)| entry)
}

/// Search the knowledge base; a miss is reported in the payload, not as an error
pub fn search_knowledge_base(topic: &str) -> Value {
    match find_entry(topic) {
        Some(entry) => json!({
            "success": true,
            "topic": topic,
            "data": entry,
        }),
        None => json!({
            "success": false,
            "topic": topic,
            "error": format!("Topic '{}' not found in knowledge base.", topic),
            "available_topics": available_topics(),
            "suggestion": "Try one of the available topics or rephrase your query.",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_spaced_topics() {
        let result = search_knowledge_base("python asyncio");
        assert_eq!(result["success"], true);
        assert_eq!(result["topic"], "python asyncio");
        assert_eq!(result["data"]["title"], "Python Asyncio Basics");
        assert_eq!(result["data"]["key_points"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_partial_match() {
        let result = search_knowledge_base("Python asyncio basics");
        assert_eq!(result["data"]["title"], "Python Asyncio Basics");

        let result = search_knowledge_base("docker");
        assert_eq!(result["data"]["title"], "Docker Containerization Basics");
    }

    #[test]
    fn test_miss_lists_topics() {
        let result = search_knowledge_base("quantum kittens");
        assert_eq!(result["success"], false);
        assert_eq!(result["available_topics"].as_array().unwrap().len(), 5);
        assert!(result["error"].as_str().unwrap().contains("quantum kittens"));
        assert!(result["suggestion"].is_string());
    }

    #[test]
    fn test_lookup_is_idempotent() {
        assert_eq!(
            search_knowledge_base("machine-learning"),
            search_knowledge_base("machine-learning")
        );
        assert_eq!(normalize_topic("Machine-Learning Basics"), "machine_learning_basics");
    }
}
