//! Types used in image processing operations.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Specifies the order of channels in an image tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChannelOrder {
    /// Channel, Height, Width order (common in PyTorch)
    CHW,
    /// Height, Width, Channel order (common in TensorFlow)
    #[default]
    HWC,
}

impl FromStr for ChannelOrder {
    type Err = String;

    fn from_str(order: &str) -> Result<Self, Self::Err> {
        match order.to_ascii_uppercase().as_str() {
            "CHW" | "NCHW" => Ok(ChannelOrder::CHW),
            "HWC" | "NHWC" => Ok(ChannelOrder::HWC),
            other => Err(format!("unknown channel order '{other}', expected CHW or HWC")),
        }
    }
}
