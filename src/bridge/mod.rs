//! JSON-lines transport to the simulator.
//!
//! Each line is one JSON object tagged by `"type"`.
//!
//! Inbound (simulator to trainer):
//! * `{"type": "model_states", "stamp": 1.5, "message": {"name": [..], "pose": [..]}}`
//! * `{"type": "scan", "stamp": 1.52, "message": {"ranges": [..]}}`
//! * `{"type": "response", "id": 3, "service": "/gazebo/reset_simulation", "success": true}`
//! * `{"type": "shutdown"}`
//!
//! The `stamp` may be omitted, in which case the message is stamped on arrival.
//!
//! Outbound (trainer to simulator):
//! * `{"type": "drive", "speed": 0.5, "steering_angle": 0.1}`
//! * `{"type": "call", "id": 3, "service": "/gazebo/pause_physics"}`
//!
//! Each call carries a new `id` which its response must echo.
//!
//! Range samples without a return are written `"inf"`; `null` is also read as `inf`.
mod client;
mod reader;

pub use client::{LinePublisher, LineServiceClient, SharedWriter};
pub use reader::{
    drop_oldest, forward_lines, spawn_reader, BridgeChannels, BridgeSenders, DropOldestSender,
};

use crate::sensors::{LaserScan, ModelStates};
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Error from the JSON-lines transport.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("transport io error")]
    Io(#[from] io::Error),
    #[error("malformed message on line {line}: {source}")]
    Decode {
        line: u64,
        #[source]
        source: serde_json::Error,
    },
}

/// Reply to a simulator service call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceResponse {
    /// Id of the answered call.
    pub id: u64,
    /// Name of the called service.
    pub service: String,
    pub success: bool,
    /// Status message.
    #[serde(default)]
    pub message: String,
}

/// A message received from the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inbound {
    ModelStates {
        #[serde(default)]
        stamp: Option<f64>,
        message: ModelStates,
    },
    Scan {
        #[serde(default)]
        stamp: Option<f64>,
        message: LaserScan,
    },
    Response(ServiceResponse),
    Shutdown,
}

/// A message sent to the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    Drive { speed: f64, steering_angle: f64 },
    Call { id: u64, service: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_scan_without_stamp() {
        let inbound: Inbound =
            serde_json::from_str(r#"{"type": "scan", "message": {"ranges": [1.0, 2.5]}}"#)
                .unwrap();
        assert_eq!(
            inbound,
            Inbound::Scan {
                stamp: None,
                message: LaserScan {
                    ranges: vec![1.0, 2.5]
                }
            }
        );
    }

    #[test]
    fn decode_response() {
        let inbound: Inbound = serde_json::from_str(
            r#"{"type": "response", "id": 4, "service": "/gazebo/pause_physics", "success": false}"#,
        )
        .unwrap();
        assert_eq!(
            inbound,
            Inbound::Response(ServiceResponse {
                id: 4,
                service: "/gazebo/pause_physics".into(),
                success: false,
                message: String::new(),
            })
        );
    }

    #[test]
    fn response_requires_id() {
        let line = r#"{"type": "response", "service": "/gazebo/pause_physics", "success": true}"#;
        assert!(serde_json::from_str::<Inbound>(line).is_err());
    }

    #[test]
    fn encode_call() {
        let line = serde_json::to_string(&Outbound::Call {
            id: 12,
            service: "/gazebo/unpause_physics".into(),
        })
        .unwrap();
        assert_eq!(
            line,
            r#"{"type":"call","id":12,"service":"/gazebo/unpause_physics"}"#
        );
    }

    #[test]
    fn encode_drive() {
        let line = serde_json::to_string(&Outbound::Drive {
            speed: 0.5,
            steering_angle: -0.25,
        })
        .unwrap();
        assert_eq!(
            line,
            r#"{"type":"drive","speed":0.5,"steering_angle":-0.25}"#
        );
    }
}
