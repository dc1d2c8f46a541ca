//! # Debug Menu 模块
//!
//! 每个对象一个调试面板（一个命名的折叠组）。
//!
//! 面板不直接修改对象，所有操作都转换成 `ObjectCommand`
//! 经对象的总线送回，在对象下一次 `update` 时处理。
//! 展示动画期间面板被禁用，禁用时的操作被忽略。

use tracing::debug;

use crate::event::{EventSender, ObjectCommand};

/// 控件
#[derive(Debug, Clone)]
pub enum DebugControl {
    /// 按钮
    Button { command: ObjectCommand },
    /// 下拉列表
    List {
        options: Vec<(String, ObjectCommand)>,
        selected: usize,
    },
    /// 数值滑条
    Number {
        value: f32,
        min: f32,
        max: f32,
        emit: fn(f32) -> ObjectCommand,
    },
    /// 二维拾取器
    Vector2 {
        x: f32,
        y: f32,
        min: f32,
        max: f32,
        emit: fn(f32, f32) -> ObjectCommand,
    },
    /// 只读监视器
    Monitor { text: String },
}

/// 带标签的控件
#[derive(Debug, Clone)]
pub struct DebugEntry {
    pub label: String,
    pub control: DebugControl,
    /// 单个控件禁用（面板整体仍可用）
    pub disabled: bool,
}

/// 调试面板
#[derive(Debug, Clone)]
pub struct DebugMenu {
    title: String,
    enabled: bool,
    entries: Vec<DebugEntry>,
    sender: EventSender<ObjectCommand>,
}

impl DebugMenu {
    /// 创建面板
    pub fn new(title: impl Into<String>, sender: EventSender<ObjectCommand>) -> Self {
        Self {
            title: title.into(),
            enabled: true,
            entries: Vec::new(),
            sender,
        }
    }

    fn push(&mut self, label: &str, control: DebugControl) -> &mut Self {
        self.entries.push(DebugEntry {
            label: label.to_string(),
            control,
            disabled: false,
        });
        self
    }

    pub fn add_button(&mut self, label: &str, command: ObjectCommand) -> &mut Self {
        self.push(label, DebugControl::Button { command })
    }

    pub fn add_list(
        &mut self,
        label: &str,
        options: Vec<(String, ObjectCommand)>,
        selected: usize,
    ) -> &mut Self {
        self.push(label, DebugControl::List { options, selected })
    }

    pub fn add_number(
        &mut self,
        label: &str,
        value: f32,
        (min, max): (f32, f32),
        emit: fn(f32) -> ObjectCommand,
    ) -> &mut Self {
        self.push(label, DebugControl::Number { value, min, max, emit })
    }

    pub fn add_vector2(
        &mut self,
        label: &str,
        (x, y): (f32, f32),
        (min, max): (f32, f32),
        emit: fn(f32, f32) -> ObjectCommand,
    ) -> &mut Self {
        self.push(label, DebugControl::Vector2 { x, y, min, max, emit })
    }

    pub fn add_monitor(&mut self, label: &str, text: impl Into<String>) -> &mut Self {
        self.push(label, DebugControl::Monitor { text: text.into() })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn entries(&self) -> &[DebugEntry] {
        &self.entries
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 单独启用 / 禁用一个控件
    pub fn set_control_disabled(&mut self, label: &str, disabled: bool) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.label == label) {
            entry.disabled = disabled;
        }
    }

    /// 找到可操作的控件
    fn usable(&mut self, label: &str) -> Option<&mut DebugControl> {
        if !self.enabled {
            debug!(menu = %self.title, label = label, "面板已禁用，忽略操作");
            return None;
        }
        self.entries
            .iter_mut()
            .find(|e| e.label == label && !e.disabled)
            .map(|e| &mut e.control)
    }

    /// 点击按钮
    ///
    /// # 返回
    /// 是否发出了命令
    pub fn press(&mut self, label: &str) -> bool {
        let command = match self.usable(label) {
            Some(DebugControl::Button { command }) => *command,
            _ => return false,
        };
        self.sender.post(command);
        true
    }

    /// 选择列表项
    pub fn select(&mut self, label: &str, index: usize) -> bool {
        let command = match self.usable(label) {
            Some(DebugControl::List { options, selected }) => match options.get(index) {
                Some((_, command)) => {
                    *selected = index;
                    *command
                }
                None => return false,
            },
            _ => return false,
        };
        self.sender.post(command);
        true
    }

    /// 修改数值（限制在范围内）
    pub fn set_number(&mut self, label: &str, new_value: f32) -> bool {
        let command = match self.usable(label) {
            Some(DebugControl::Number { value, min, max, emit }) => {
                *value = new_value.clamp(*min, *max);
                (*emit)(*value)
            }
            _ => return false,
        };
        self.sender.post(command);
        true
    }

    /// 修改二维值（限制在范围内）
    pub fn set_vector2(&mut self, label: &str, new_x: f32, new_y: f32) -> bool {
        let command = match self.usable(label) {
            Some(DebugControl::Vector2 { x, y, min, max, emit }) => {
                *x = new_x.clamp(*min, *max);
                *y = new_y.clamp(*min, *max);
                (*emit)(*x, *y)
            }
            _ => return false,
        };
        self.sender.post(command);
        true
    }

    /// 更新监视器文本（面板禁用时也会更新）
    pub fn update_monitor(&mut self, label: &str, new_text: impl Into<String>) {
        let entry = self.entries.iter_mut().find(|e| e.label == label);
        if let Some(DebugEntry {
            control: DebugControl::Monitor { text },
            ..
        }) = entry
        {
            *text = new_text.into();
        }
    }

    /// 读取监视器文本
    pub fn monitor(&self, label: &str) -> Option<&str> {
        self.entries.iter().find_map(|e| match &e.control {
            DebugControl::Monitor { text } if e.label == label => Some(text.as_str()),
            _ => None,
        })
    }

    /// 同步二维值的显示（不发出命令）
    pub fn refresh_vector2(&mut self, label: &str, new_x: f32, new_y: f32) {
        for entry in self.entries.iter_mut().filter(|e| e.label == label) {
            if let DebugControl::Vector2 { x, y, .. } = &mut entry.control {
                *x = new_x;
                *y = new_y;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventBus;

    fn menu(bus: &EventBus<ObjectCommand>) -> DebugMenu {
        let mut menu = DebugMenu::new("Test", bus.sender());
        menu.add_button("Push all", ObjectCommand::PushAllCases)
            .add_list(
                "Case",
                vec![
                    ("1".to_string(), ObjectCommand::PushCase { case: 0 }),
                    ("2".to_string(), ObjectCommand::PushCase { case: 1 }),
                ],
                0,
            )
            .add_number("Speed", 2.0, (0.1, 5.0), |speed| ObjectCommand::SetSpeed { speed })
            .add_monitor("State", "Closed");
        menu
    }

    #[test]
    fn test_controls_post_commands() {
        let bus = EventBus::new();
        let mut menu = menu(&bus);

        assert!(menu.press("Push all"));
        assert!(menu.select("Case", 1));
        assert!(menu.set_number("Speed", 9.0));
        assert!(!menu.press("Missing"));
        assert!(!menu.select("Case", 5));

        assert_eq!(
            bus.drain(),
            vec![
                ObjectCommand::PushAllCases,
                ObjectCommand::PushCase { case: 1 },
                ObjectCommand::SetSpeed { speed: 5.0 },
            ]
        );
    }

    #[test]
    fn test_disabled_menu_swallows_input() {
        let bus = EventBus::new();
        let mut menu = menu(&bus);

        menu.disable();
        assert!(!menu.press("Push all"));
        assert!(bus.is_empty());

        menu.update_monitor("State", "Moving");
        assert_eq!(menu.monitor("State"), Some("Moving"));

        menu.enable();
        menu.set_control_disabled("Push all", true);
        assert!(!menu.press("Push all"));
        assert!(menu.select("Case", 0));
    }
}
