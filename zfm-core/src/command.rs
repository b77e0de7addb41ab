//! ZFM instruction codes and confirmation codes

use std::fmt;

use crate::error::{Error, Result};

/// Instruction codes (first payload byte of a command packet)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    // Image capture & feature extraction
    GetImage = 0x01,
    ImageToTemplate = 0x02,
    Match = 0x03,
    HighSpeedSearch = 0x04,
    RegisterModel = 0x05,

    // Template library
    Store = 0x06,
    Load = 0x07,
    Upload = 0x08,
    Download = 0x09,
    Delete = 0x0C,
    Empty = 0x0D,

    // System
    SetSysParam = 0x0E,
    ReadSysParam = 0x0F,
    VerifyPassword = 0x13,
    ReadSysInfo = 0x16,
    TemplateCount = 0x1D,
}

impl Command {
    /// Get command name as printed in the module datasheet
    pub fn name(self) -> &'static str {
        match self {
            Self::GetImage => "GenImg",
            Self::ImageToTemplate => "Img2Tz",
            Self::Match => "Match",
            Self::HighSpeedSearch => "HighSpeedSearch",
            Self::RegisterModel => "RegModel",
            Self::Store => "Store",
            Self::Load => "LoadChar",
            Self::Upload => "UpChar",
            Self::Download => "DownChar",
            Self::Delete => "DeletChar",
            Self::Empty => "Empty",
            Self::SetSysParam => "SetSysPara",
            Self::ReadSysParam => "ReadSysPara",
            Self::VerifyPassword => "VfyPwd",
            Self::ReadSysInfo => "ReadInfPage",
            Self::TemplateCount => "TempleteNum",
        }
    }
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> u8 {
        cmd as u8
    }
}

impl TryFrom<u8> for Command {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::GetImage),
            0x02 => Ok(Self::ImageToTemplate),
            0x03 => Ok(Self::Match),
            0x04 => Ok(Self::HighSpeedSearch),
            0x05 => Ok(Self::RegisterModel),
            0x06 => Ok(Self::Store),
            0x07 => Ok(Self::Load),
            0x08 => Ok(Self::Upload),
            0x09 => Ok(Self::Download),
            0x0C => Ok(Self::Delete),
            0x0D => Ok(Self::Empty),
            0x0E => Ok(Self::SetSysParam),
            0x0F => Ok(Self::ReadSysParam),
            0x13 => Ok(Self::VerifyPassword),
            0x16 => Ok(Self::ReadSysInfo),
            0x1D => Ok(Self::TemplateCount),
            _ => Err(Error::UnknownCommand(value)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}

/// Confirmation code carried in the first payload byte of an acknowledgement
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    PacketReceiveError,
    NoFinger,
    ImageFail,
    ImageMessy,
    FeatureFail,
    NoMatch,
    NotFound,
    EnrollMismatch,
    BadLocation,
    DbRangeFail,
    UploadFeatureFail,
    PacketResponseFail,
    UploadFail,
    DeleteFail,
    DbClearFail,
    PassFail,
    InvalidImage,
    FlashError,
    InvalidRegister,
    AddressCode,
    PasswordVerify,
    Unknown(u8),
}

impl Status {
    /// Map a raw confirmation code; codes outside the datasheet become `Unknown`
    pub fn from_code(code: u8) -> Self {
        match code {
            0x00 => Self::Ok,
            0x01 => Self::PacketReceiveError,
            0x02 => Self::NoFinger,
            0x03 => Self::ImageFail,
            0x06 => Self::ImageMessy,
            0x07 => Self::FeatureFail,
            0x08 => Self::NoMatch,
            0x09 => Self::NotFound,
            0x0A => Self::EnrollMismatch,
            0x0B => Self::BadLocation,
            0x0C => Self::DbRangeFail,
            0x0D => Self::UploadFeatureFail,
            0x0E => Self::PacketResponseFail,
            0x0F => Self::UploadFail,
            0x10 => Self::DeleteFail,
            0x11 => Self::DbClearFail,
            0x13 => Self::PassFail,
            0x15 => Self::InvalidImage,
            0x18 => Self::FlashError,
            0x1A => Self::InvalidRegister,
            0x20 => Self::AddressCode,
            0x21 => Self::PasswordVerify,
            other => Self::Unknown(other),
        }
    }

    /// Raw confirmation code
    pub fn code(self) -> u8 {
        match self {
            Self::Ok => 0x00,
            Self::PacketReceiveError => 0x01,
            Self::NoFinger => 0x02,
            Self::ImageFail => 0x03,
            Self::ImageMessy => 0x06,
            Self::FeatureFail => 0x07,
            Self::NoMatch => 0x08,
            Self::NotFound => 0x09,
            Self::EnrollMismatch => 0x0A,
            Self::BadLocation => 0x0B,
            Self::DbRangeFail => 0x0C,
            Self::UploadFeatureFail => 0x0D,
            Self::PacketResponseFail => 0x0E,
            Self::UploadFail => 0x0F,
            Self::DeleteFail => 0x10,
            Self::DbClearFail => 0x11,
            Self::PassFail => 0x13,
            Self::InvalidImage => 0x15,
            Self::FlashError => 0x18,
            Self::InvalidRegister => 0x1A,
            Self::AddressCode => 0x20,
            Self::PasswordVerify => 0x21,
            Self::Unknown(code) => code,
        }
    }

    /// Check if this is a success code
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}(0x{:02X})", self, self.code())
    }
}
