//! Host-owned registry of nodesets and networks.
//!
//! A [`Workspace`] replaces process-wide registries: the host creates one,
//! resolves variable names through it, and drops it to tear everything down.
//! Nodesets are either free-standing or owned by exactly one network; the
//! "which networks use this nodeset" question is answered by scanning the
//! registry, so nodesets never point back at their networks.

use std::collections::BTreeMap;

use strata_core::errors::{codes, StrataError};
use strata_core::RngHandle;
use tracing::info;

use crate::algorithms::{connected_components, ComponentSummary};
use crate::config::WorkspaceConfig;
use crate::errors::{constraint, invalid_argument, not_found};
use crate::generators::random_two_mode;
use crate::network::Network;
use crate::nodeset::Nodeset;

/// Registry of named nodesets and networks plus the shared RNG.
#[derive(Debug)]
pub struct Workspace {
    config: WorkspaceConfig,
    nodesets: BTreeMap<String, Nodeset>,
    networks: BTreeMap<String, Network>,
    rng: RngHandle,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(WorkspaceConfig::default())
    }
}

impl Workspace {
    /// Creates an empty workspace seeded from the configuration.
    pub fn new(config: WorkspaceConfig) -> Self {
        let rng = RngHandle::from_seed(config.seed_policy.master_seed);
        Self {
            config,
            nodesets: BTreeMap::new(),
            networks: BTreeMap::new(),
            rng,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// The workspace RNG.
    pub fn rng_mut(&mut self) -> &mut RngHandle {
        &mut self.rng
    }

    /// Re-seeds the workspace RNG.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = RngHandle::from_seed(seed);
    }

    /// Names of free-standing nodesets, sorted.
    pub fn nodeset_names(&self) -> Vec<&str> {
        self.nodesets.keys().map(String::as_str).collect()
    }

    /// Names of networks, sorted.
    pub fn network_names(&self) -> Vec<&str> {
        self.networks.keys().map(String::as_str).collect()
    }

    /// Creates a free-standing nodeset with `node_count` nodes.
    pub fn create_nodeset(
        &mut self,
        name: &str,
        node_count: usize,
    ) -> Result<&mut Nodeset, StrataError> {
        self.ensure_name_free(name)?;
        if let Some(max) = self.config.limits.max_nodes {
            if node_count > max {
                return Err(invalid_argument("node count exceeds configured limit")
                    .with_context("requested", node_count)
                    .with_context("max_nodes", max));
            }
        }
        let nodeset = Nodeset::with_nodes(name, node_count)?;
        info!(nodeset = name, nodes = node_count, "nodeset created");
        Ok(self.nodesets.entry(name.to_string()).or_insert(nodeset))
    }

    /// Registers an already built free-standing nodeset under its own name.
    pub fn insert_nodeset(&mut self, nodeset: Nodeset) -> Result<(), StrataError> {
        self.ensure_name_free(nodeset.name())?;
        info!(nodeset = nodeset.name(), nodes = nodeset.len(), "nodeset registered");
        self.nodesets.insert(nodeset.name().to_string(), nodeset);
        Ok(())
    }

    /// Looks up a nodeset, free-standing or owned by a network.
    pub fn nodeset(&self, name: &str) -> Result<&Nodeset, StrataError> {
        if let Some(nodeset) = self.nodesets.get(name) {
            return Ok(nodeset);
        }
        self.networks
            .values()
            .map(Network::nodeset)
            .find(|nodeset| nodeset.name() == name)
            .ok_or_else(|| nodeset_not_found(name))
    }

    /// Mutable access to a free-standing nodeset.
    ///
    /// Nodesets owned by a network are mutated through the network so that
    /// node removal cascades into its layers.
    pub fn nodeset_mut(&mut self, name: &str) -> Result<&mut Nodeset, StrataError> {
        if !self.nodesets.contains_key(name) && !self.networks_using_nodeset(name).is_empty() {
            return Err(nodeset_in_use(name, self.networks_using_nodeset(name)));
        }
        self.nodesets
            .get_mut(name)
            .ok_or_else(|| nodeset_not_found(name))
    }

    /// Deletes a free-standing nodeset; rejected while a network owns it.
    pub fn delete_nodeset(&mut self, name: &str) -> Result<Nodeset, StrataError> {
        let users = self.networks_using_nodeset(name);
        if !users.is_empty() {
            return Err(nodeset_in_use(name, users));
        }
        let nodeset = self
            .nodesets
            .remove(name)
            .ok_or_else(|| nodeset_not_found(name))?;
        info!(nodeset = name, "nodeset deleted");
        Ok(nodeset)
    }

    /// Networks whose nodeset is called `nodeset`.
    pub fn networks_using_nodeset(&self, nodeset: &str) -> Vec<String> {
        self.networks
            .values()
            .filter(|network| network.nodeset().name() == nodeset)
            .map(|network| network.name().to_string())
            .collect()
    }

    /// Creates a network that takes ownership of a free-standing nodeset.
    pub fn create_network(
        &mut self,
        name: &str,
        nodeset: &str,
    ) -> Result<&mut Network, StrataError> {
        self.ensure_name_free(name)?;
        if !self.nodesets.contains_key(nodeset) {
            let users = self.networks_using_nodeset(nodeset);
            if !users.is_empty() {
                return Err(nodeset_in_use(nodeset, users));
            }
            return Err(nodeset_not_found(nodeset));
        }
        let owned = self
            .nodesets
            .remove(nodeset)
            .ok_or_else(|| nodeset_not_found(nodeset))?;
        info!(network = name, nodeset, nodes = owned.len(), "network created");
        Ok(self
            .networks
            .entry(name.to_string())
            .or_insert(Network::new(name, owned)))
    }

    /// Looks up a network.
    pub fn network(&self, name: &str) -> Result<&Network, StrataError> {
        self.networks
            .get(name)
            .ok_or_else(|| network_not_found(name))
    }

    /// Looks up a network mutably.
    pub fn network_mut(&mut self, name: &str) -> Result<&mut Network, StrataError> {
        self.networks
            .get_mut(name)
            .ok_or_else(|| network_not_found(name))
    }

    /// A network together with the workspace RNG, for generators and samplers.
    pub fn network_and_rng(
        &mut self,
        name: &str,
    ) -> Result<(&mut Network, &mut RngHandle), StrataError> {
        let network = self
            .networks
            .get_mut(name)
            .ok_or_else(|| network_not_found(name))?;
        Ok((network, &mut self.rng))
    }

    /// Labels weak components of a network under the configured
    /// `naming.component_attribute`.
    pub fn label_components(
        &mut self,
        network: &str,
        layer: Option<&str>,
    ) -> Result<ComponentSummary, StrataError> {
        let attribute = self.config.naming.component_attribute.clone();
        let network = self
            .networks
            .get_mut(network)
            .ok_or_else(|| network_not_found(network))?;
        connected_components(network, layer, &attribute)
    }

    /// Fills a two-mode layer with random affiliations, naming hyperedges
    /// with the configured `naming.hyperedge_prefix` and drawing from the
    /// workspace RNG.
    pub fn generate_two_mode(
        &mut self,
        network: &str,
        layer: &str,
        hyperedges: usize,
        average: f64,
    ) -> Result<usize, StrataError> {
        let prefix = self.config.naming.hyperedge_prefix.clone();
        let (network, rng) = self.network_and_rng(network)?;
        random_two_mode(network, layer, hyperedges, average, &prefix, rng)
    }

    /// Deletes a network. With `release_nodeset` its nodeset returns to the
    /// free-standing pool, otherwise it is dropped along with the layers.
    pub fn delete_network(&mut self, name: &str, release_nodeset: bool) -> Result<(), StrataError> {
        let network = self
            .networks
            .remove(name)
            .ok_or_else(|| network_not_found(name))?;
        let nodeset = network.into_nodeset();
        info!(network = name, nodeset = nodeset.name(), release_nodeset, "network deleted");
        if release_nodeset {
            self.nodesets.insert(nodeset.name().to_string(), nodeset);
        }
        Ok(())
    }

    fn ensure_name_free(&self, name: &str) -> Result<(), StrataError> {
        if name.trim().is_empty() {
            return Err(invalid_argument("name must not be empty"));
        }
        let owned_nodeset = self
            .networks
            .values()
            .any(|network| network.nodeset().name() == name);
        if self.nodesets.contains_key(name) || self.networks.contains_key(name) || owned_nodeset {
            return Err(constraint(codes::NAME_ALREADY_EXISTS, "name is already in use")
                .with_context("name", name));
        }
        Ok(())
    }
}

fn nodeset_not_found(name: &str) -> StrataError {
    not_found(codes::NODESET_NOT_FOUND, "nodeset does not exist").with_context("nodeset", name)
}

fn network_not_found(name: &str) -> StrataError {
    not_found(codes::NETWORK_NOT_FOUND, "network does not exist").with_context("network", name)
}

fn nodeset_in_use(name: &str, networks: Vec<String>) -> StrataError {
    constraint(codes::CONSTRAINT_NODESET_IN_USE, "nodeset is used by a network")
        .with_context("nodeset", name)
        .with_context("networks", networks.join(","))
        .with_hint("delete the network first or release its nodeset")
}
