use cardkit::control::ControlCommand;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Show,
    Hide,
    Spread,
    Reset,
    ConfigReload,
}

impl From<ControlCommand> for AppEvent {
    fn from(command: ControlCommand) -> Self {
        match command {
            ControlCommand::Show => AppEvent::Show,
            ControlCommand::Hide => AppEvent::Hide,
            ControlCommand::Spread => AppEvent::Spread,
            ControlCommand::Reset => AppEvent::Reset,
        }
    }
}
