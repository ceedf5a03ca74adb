//! Patch file format and operations.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use ondula_core::{Addition, Block, CompositeFilter, Delay, Gain, NodeId};

use crate::endpoint::{Endpoint, is_reserved};
use crate::error::ConfigError;

/// A composite filter graph described declaratively.
///
/// Patches are stored as TOML files: the composite's port counts, a list of
/// named blocks, and a list of connections between `"<block>[:<port>]"`
/// endpoints. The reserved endpoint names `input` and `output` stand for the
/// composite's own ports.
///
/// # TOML Format
///
/// ```toml
/// name = "echo"
/// inputs = 1
/// outputs = 1
///
/// [[blocks]]
/// id = "sum"
/// type = "addition"
///
/// [[blocks]]
/// id = "late"
/// type = "delay"
/// samples = 4410
///
/// [[blocks]]
/// id = "fb"
/// type = "gain"
/// gain = 0.6
///
/// [[connections]]
/// from = "input:0"
/// to = "sum:0"
///
/// [[connections]]
/// from = "sum"
/// to = "late"
///
/// [[connections]]
/// from = "late"
/// to = "fb"
///
/// [[connections]]
/// from = "fb"
/// to = "sum:1"
///
/// [[connections]]
/// from = "sum"
/// to = "output:0"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patch {
    /// Name of the patch.
    pub name: String,

    /// Optional description of the patch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Number of composite inputs (defaults to 1).
    #[serde(default = "default_ports")]
    pub inputs: usize,

    /// Number of composite outputs (defaults to 1).
    #[serde(default = "default_ports")]
    pub outputs: usize,

    /// Blocks in the graph.
    #[serde(default)]
    pub blocks: Vec<BlockConfig>,

    /// Connections between blocks and the composite's ports.
    #[serde(default)]
    pub connections: Vec<ConnectionConfig>,
}

fn default_ports() -> usize {
    1
}

/// A named block in a patch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlockConfig {
    /// Unique id within the patch; `input` and `output` are reserved.
    pub id: String,

    /// What the block is, with its parameters.
    #[serde(flatten)]
    pub kind: BlockKind,
}

impl BlockConfig {
    /// Create a block config.
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

/// Block type and parameters, tagged by the `type` key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    /// Constant gain.
    Gain {
        /// Linear gain factor.
        gain: f32,
    },
    /// Two-input sum.
    Addition,
    /// Fixed delay.
    Delay {
        /// Delay length in samples, at least 1.
        samples: usize,
    },
    /// Recirculating echo.
    Echo {
        /// Feedback gain.
        gain: f32,
        /// Delay in samples.
        delay: usize,
    },
    /// Single-repeat echo.
    AltEcho {
        /// Repeat level.
        gain: f32,
        /// Delay in samples.
        delay: usize,
    },
    /// Schroeder all-pass section.
    AllPass {
        /// All-pass coefficient.
        gain: f32,
        /// Delay in samples.
        delay: usize,
    },
    /// Recursive low-pass.
    LowPass {
        /// Feedback coefficient.
        gain: f32,
        /// Delay in samples.
        delay: usize,
    },
    /// Room reverberator.
    Reverberator,
    /// A nested patch, used as one block.
    Patch {
        /// The nested graph.
        patch: Box<Patch>,
    },
}

impl BlockKind {
    /// The `type` string for this kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            BlockKind::Gain { .. } => "gain",
            BlockKind::Addition => "addition",
            BlockKind::Delay { .. } => "delay",
            BlockKind::Echo { .. } => "echo",
            BlockKind::AltEcho { .. } => "alt_echo",
            BlockKind::AllPass { .. } => "all_pass",
            BlockKind::LowPass { .. } => "low_pass",
            BlockKind::Reverberator => "reverberator",
            BlockKind::Patch { .. } => "patch",
        }
    }

    /// Instantiates the block; `id` is only used in error messages.
    pub fn build(&self, id: &str) -> Result<Block, ConfigError> {
        let block = match self {
            BlockKind::Gain { gain } => Block::from(Gain::new(*gain)),
            BlockKind::Addition => Block::from(Addition::new()),
            BlockKind::Delay { samples } => {
                Block::from(Delay::new(positive(id, "samples", *samples)?))
            }
            BlockKind::Echo { gain, delay } => {
                ondula_effects::echo(*gain, positive(id, "delay", *delay)?)?.into()
            }
            BlockKind::AltEcho { gain, delay } => {
                ondula_effects::alt_echo(*gain, positive(id, "delay", *delay)?)?.into()
            }
            BlockKind::AllPass { gain, delay } => {
                ondula_effects::all_pass(*gain, positive(id, "delay", *delay)?)?.into()
            }
            BlockKind::LowPass { gain, delay } => {
                ondula_effects::low_pass(*gain, positive(id, "delay", *delay)?)?.into()
            }
            BlockKind::Reverberator => ondula_effects::reverberator()?.into(),
            BlockKind::Patch { patch } => patch.build()?.into(),
        };
        Ok(block)
    }
}

fn positive(block: &str, param: &str, value: usize) -> Result<usize, ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidParameter {
            block: block.to_string(),
            param: param.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(value)
}

/// A connection between two endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Source: a block output or `input:<n>`.
    pub from: Endpoint,
    /// Target: a block input or `output:<n>`.
    pub to: Endpoint,
}

impl Patch {
    /// Create an empty patch with the given port counts.
    pub fn new(name: impl Into<String>, inputs: usize, outputs: usize) -> Self {
        Self {
            name: name.into(),
            description: None,
            inputs,
            outputs,
            blocks: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a block.
    pub fn with_block(mut self, id: impl Into<String>, kind: BlockKind) -> Self {
        self.blocks.push(BlockConfig::new(id, kind));
        self
    }

    /// Add a connection.
    pub fn with_connection(mut self, from: Endpoint, to: Endpoint) -> Self {
        self.connections.push(ConnectionConfig { from, to });
        self
    }

    /// Load a patch from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Load a patch from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the patch to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the patch to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Builds the described graph.
    ///
    /// Block and endpoint errors are reported here; an incompletely wired
    /// graph is not an error, check [`CompositeFilter::is_valid()`] on the
    /// result.
    pub fn build(&self) -> Result<CompositeFilter, ConfigError> {
        let mut composite = CompositeFilter::new(self.inputs, self.outputs);
        let mut ids: HashMap<&str, NodeId> = HashMap::with_capacity(self.blocks.len());

        for block in &self.blocks {
            if is_reserved(&block.id) {
                return Err(ConfigError::ReservedBlockId(block.id.clone()));
            }
            if ids.contains_key(block.id.as_str()) {
                return Err(ConfigError::DuplicateBlock(block.id.clone()));
            }
            let node = composite.add_block(block.kind.build(&block.id)?);
            ids.insert(&block.id, node);
        }

        let lookup = |endpoint: &Endpoint| {
            ids.get(endpoint.node.as_str())
                .copied()
                .ok_or_else(|| ConfigError::UnknownBlock(endpoint.node.clone()))
        };

        for ConnectionConfig { from, to } in &self.connections {
            if from.is_output() {
                return Err(ConfigError::malformed_endpoint(
                    from.to_string(),
                    "output cannot be a connection source",
                ));
            }
            if to.is_input() {
                return Err(ConfigError::malformed_endpoint(
                    to.to_string(),
                    "input cannot be a connection target",
                ));
            }

            match (from.is_input(), to.is_output()) {
                (true, true) => composite.connect_input_to_output(from.port, to.port)?,
                (true, false) => composite.connect_input_to_block(from.port, lookup(to)?, to.port)?,
                (false, true) => {
                    composite.connect_block_to_output(lookup(from)?, from.port, to.port)?;
                }
                (false, false) => composite.connect_block_to_block(
                    lookup(from)?,
                    from.port,
                    lookup(to)?,
                    to.port,
                )?,
            }
        }

        Ok(composite)
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the patch has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
