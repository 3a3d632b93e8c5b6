//! Controller commands
//!
//! Opcodes understood by the panel controller, both in its bootloader
//! image (scene select, display on/off) and once programmed (frame).

use heapless::Vec;

// Opcodes
pub const CMD_DISPLAY_OFF: u8 = 0x02;
pub const CMD_DISPLAY_ON: u8 = 0x03;
pub const CMD_SCENE: u8 = 0x04;
pub const CMD_FRAME: u8 = 0x05;

/// Longest encoded command (opcode + operand)
pub const MAX_COMMAND_LEN: usize = 2;

/// Bootloader scene shown while the controller image is loading
pub const SPLASH_SCENE: u8 = 2;

/// Commands sent to the panel controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerCommand {
    /// Blank the panel (bootloader only)
    DisplayOff,
    /// Power the panel on (bootloader only)
    DisplayOn,
    /// Show a pre-baked bootloader scene
    SelectScene(u8),
    /// Announce that a full frame follows
    FrameBegin,
}

/// Errors decoding a captured command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// No bytes were clocked out
    Empty,
    /// Opcode is not part of the command set
    UnknownOpcode(u8),
    /// Opcode needs an operand that was not sent
    MissingOperand,
    /// More bytes than the command takes
    TrailingBytes,
}

impl ControllerCommand {
    /// Opcode byte for this command
    pub const fn opcode(&self) -> u8 {
        match self {
            ControllerCommand::DisplayOff => CMD_DISPLAY_OFF,
            ControllerCommand::DisplayOn => CMD_DISPLAY_ON,
            ControllerCommand::SelectScene(_) => CMD_SCENE,
            ControllerCommand::FrameBegin => CMD_FRAME,
        }
    }

    /// Encode into the bytes clocked out during one chip-select window
    pub fn encode(&self) -> Vec<u8, MAX_COMMAND_LEN> {
        let mut out = Vec::new();
        // Capacity covers opcode + operand, pushes cannot fail
        let _ = out.push(self.opcode());
        if let ControllerCommand::SelectScene(scene) = self {
            let _ = out.push(*scene);
        }
        out
    }

    /// Decode the bytes of one chip-select window
    pub fn decode(bytes: &[u8]) -> Result<Self, CommandError> {
        let (&opcode, rest) = bytes.split_first().ok_or(CommandError::Empty)?;

        let (cmd, operand_len) = match opcode {
            CMD_DISPLAY_OFF => (ControllerCommand::DisplayOff, 0),
            CMD_DISPLAY_ON => (ControllerCommand::DisplayOn, 0),
            CMD_FRAME => (ControllerCommand::FrameBegin, 0),
            CMD_SCENE => {
                let scene = *rest.first().ok_or(CommandError::MissingOperand)?;
                (ControllerCommand::SelectScene(scene), 1)
            }
            other => return Err(CommandError::UnknownOpcode(other)),
        };

        if rest.len() > operand_len {
            return Err(CommandError::TrailingBytes);
        }

        Ok(cmd)
    }
}
