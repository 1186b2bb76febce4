use std::net::SocketAddr;

const DEFAULT_MAX_TASKS: usize = 10_000;

#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Identifier this node uses in cluster reports.
    pub node_id: String,
    pub listen_addr: SocketAddr,
    /// When false the node behaves as a single-node deployment: cluster
    /// reports are refused and only local state is consulted.
    pub clustered: bool,
    pub max_tasks: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node_id: "node-1".to_string(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            clustered: false,
            max_tasks: DEFAULT_MAX_TASKS,
        }
    }
}

impl NodeConfig {
    pub fn new(node_id: impl Into<String>, listen_addr: SocketAddr) -> Self {
        Self {
            node_id: node_id.into(),
            listen_addr,
            ..Default::default()
        }
    }

    pub fn with_clustered(mut self, clustered: bool) -> Self {
        self.clustered = clustered;
        self
    }

    pub fn with_max_tasks(mut self, max_tasks: usize) -> Self {
        self.max_tasks = max_tasks;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_config_default() {
        let cfg = NodeConfig::default();
        assert_eq!(cfg.node_id, "node-1");
        assert_eq!(cfg.listen_addr.to_string(), "127.0.0.1:8080");
        assert!(!cfg.clustered);
        assert_eq!(cfg.max_tasks, 10_000);
    }

    #[test]
    fn node_config_new() {
        let addr: SocketAddr = "10.0.0.1:9000".parse().unwrap();
        let cfg = NodeConfig::new("node-a", addr);
        assert_eq!(cfg.node_id, "node-a");
        assert_eq!(cfg.listen_addr, addr);
        assert!(!cfg.clustered);
    }

    #[test]
    fn node_config_builders() {
        let cfg = NodeConfig::default()
            .with_clustered(true)
            .with_max_tasks(5);
        assert!(cfg.clustered);
        assert_eq!(cfg.max_tasks, 5);
    }
}
