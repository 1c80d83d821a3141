// setter.rs — 系统壁纸设置模块
// 按操作系统一次性分发：Linux 识别桌面环境后调用对应命令，
// Windows 交给 wallpaper 库的系统调用，macOS 用 osascript 按桌面编号设置。

use rust_i18n::t;
use std::path::Path;
use std::process::Command; // 用于创建和执行子进程

/// Linux 桌面环境的封闭集合
///
/// 每个变体自带命令构造逻辑，识别不出的环境不在集合内，
/// 由调用方打印提示后跳过设置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesktopEnvironment {
    Kde,
    Gnome,
    Lubuntu,
    Mate,
    /// i3 / leftwm / dwm 这类平铺窗口管理器，统一走 feh
    Tiling,
    Xfce,
}

/// 识别用到的会话环境变量快照，单独成结构体便于测试
#[derive(Debug, Default)]
pub struct SessionEnv {
    pub kde_full_session: Option<String>,
    pub gnome_session_id: Option<String>,
    pub xdg_current_desktop: Option<String>,
    pub desktop_session: Option<String>,
}

impl SessionEnv {
    fn current() -> Self {
        Self {
            kde_full_session: std::env::var("KDE_FULL_SESSION").ok(),
            gnome_session_id: std::env::var("GNOME_DESKTOP_SESSION_ID").ok(),
            xdg_current_desktop: std::env::var("XDG_CURRENT_DESKTOP").ok(),
            desktop_session: std::env::var("DESKTOP_SESSION").ok(),
        }
    }
}

impl DesktopEnvironment {
    /// 识别当前桌面环境
    ///
    /// 先查会话环境变量，都对不上再通过 xprop 探测 XFCE
    pub fn detect() -> Option<Self> {
        Self::classify(&SessionEnv::current()).or_else(Self::probe_xfce)
    }

    /// 环境变量部分的识别逻辑，固定优先级：
    /// KDE → GNOME → Lubuntu → MATE → 平铺窗口管理器
    fn classify(session: &SessionEnv) -> Option<Self> {
        if session.kde_full_session.as_deref() == Some("true") {
            return Some(Self::Kde);
        }

        let gnome_by_xdg = session
            .xdg_current_desktop
            .as_deref()
            .is_some_and(|v| v.to_uppercase().contains("GNOME"));
        if session.gnome_session_id.is_some() || gnome_by_xdg {
            return Some(Self::Gnome);
        }

        match session.desktop_session.as_deref() {
            Some("Lubuntu") => Some(Self::Lubuntu),
            Some("mate") => Some(Self::Mate),
            Some("i3") | Some("leftwm") | Some("dwm") => Some(Self::Tiling),
            _ => None,
        }
    }

    /// XFCE 不设会话变量，向 X 根窗口查询 _DT_SAVE_MODE 属性
    fn probe_xfce() -> Option<Self> {
        let output = Command::new("xprop").args(["-root", "_DT_SAVE_MODE"]).output().ok()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout.contains(" = \"xfce4\"").then_some(Self::Xfce)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Kde => "kde",
            Self::Gnome => "gnome",
            Self::Lubuntu => "lubuntu",
            Self::Mate => "mate",
            Self::Tiling => "feh",
            Self::Xfce => "xfce",
        }
    }

    /// 构造该环境的设置命令，个别环境需要连续执行多条
    fn invocations(&self, save_location: &str) -> Vec<Command> {
        match self {
            Self::Kde => {
                // PlasmaShell 的标准 JS 接口，对每个桌面写 org.kde.image 配置
                let script = format!(
                    "var allDesktops = desktops();\n\
                     for (var i = 0; i < allDesktops.length; i++) {{\n\
                       var d = allDesktops[i];\n\
                       d.wallpaperPlugin = 'org.kde.image';\n\
                       d.currentConfigGroup = ['Wallpaper', 'org.kde.image', 'General'];\n\
                       d.writeConfig('Image', 'file://{save_location}');\n\
                     }}\n"
                );
                let mut command = Command::new("qdbus");
                command.args([
                    "org.kde.plasmashell",
                    "/PlasmaShell",
                    "org.kde.PlasmaShell.evaluateScript",
                    &script,
                ]);
                vec![command]
            }
            Self::Gnome => {
                // 浅色和深色主题各有一个键，GNOME 42+ 两个都要写
                let uri = format!("file://{save_location}");
                let mut light = Command::new("gsettings");
                light.args(["set", "org.gnome.desktop.background", "picture-uri", &uri]);
                let mut dark = Command::new("gsettings");
                dark.args(["set", "org.gnome.desktop.background", "picture-uri-dark", &uri]);
                vec![light, dark]
            }
            Self::Lubuntu => {
                let mut command = Command::new("pcmanfm");
                command.args(["-w", save_location, "--wallpaper-mode=fit"]);
                vec![command]
            }
            Self::Mate => {
                let mut command = Command::new("gsettings");
                command.args([
                    "set",
                    "org.mate.background",
                    "picture-filename",
                    save_location,
                ]);
                vec![command]
            }
            Self::Tiling => {
                let mut command = Command::new("feh");
                command.args(["--bg-scale", save_location]);
                vec![command]
            }
            Self::Xfce => {
                let mut command = Command::new("xfconf-query");
                command.args([
                    "-c",
                    "xfce4-desktop",
                    "-p",
                    "/backdrop/screen0/monitor0/workspace0/last-image",
                    "-s",
                    save_location,
                ]);
                vec![command]
            }
        }
    }
}

/// 将指定路径的图片设置为系统壁纸
///
/// 命令执行结果会被检查：起不来或非零退出都是带 stderr 的可报告错误。
/// 「不支持的桌面环境/操作系统」只打印提示，不算失败。
pub fn apply(save_location: &Path, display: u32) -> Result<(), Box<dyn std::error::Error>> {
    let path_str = save_location.to_str().ok_or(t!("error_utf8"))?;

    match std::env::consts::OS {
        "linux" => apply_linux(path_str),
        // wallpaper 库封装了 Windows 的 SystemParametersInfoW 调用
        "windows" => wallpaper::set_from_path(path_str)
            .map_err(|e| format!("{}: {}", t!("error_set_failed"), e).into()),
        "macos" => run(macos_invocation(path_str, display), "osascript"),
        other => {
            println!("{}", t!("unsupported_os", os => other));
            Ok(())
        }
    }
}

fn apply_linux(save_location: &str) -> Result<(), Box<dyn std::error::Error>> {
    match DesktopEnvironment::detect() {
        Some(environment) => {
            for command in environment.invocations(save_location) {
                run(command, environment.name())?;
            }
            Ok(())
        }
        None => {
            println!("{}", t!("unsupported_de"));
            Ok(())
        }
    }
}

/// macOS 通过 System Events 设置：display 为 0 时遍历所有桌面，
/// 否则只设置指定编号的桌面
fn macos_invocation(save_location: &str, display: u32) -> Command {
    let script = if display == 0 {
        format!(
            "tell application \"System Events\"\n\
             \tset desktopCount to count of desktops\n\
             \trepeat with desktopNumber from 1 to desktopCount\n\
             \t\ttell desktop desktopNumber\n\
             \t\t\tset picture to \"{save_location}\"\n\
             \t\tend tell\n\
             \tend repeat\n\
             end tell"
        )
    } else {
        format!(
            "tell application \"System Events\"\n\
             \ttell desktop {display}\n\
             \t\tset picture to \"{save_location}\"\n\
             \tend tell\n\
             end tell"
        )
    };
    let mut command = Command::new("osascript");
    command.arg("-e").arg(script);
    command
}

/// 执行单条设置命令并检查退出状态
fn run(mut command: Command, label: &str) -> Result<(), Box<dyn std::error::Error>> {
    let output = command.output()?;
    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(t!("error_setter_command", command => label, stderr => stderr).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(
        kde: Option<&str>,
        gnome_id: Option<&str>,
        xdg: Option<&str>,
        desktop_session: Option<&str>,
    ) -> SessionEnv {
        SessionEnv {
            kde_full_session: kde.map(str::to_owned),
            gnome_session_id: gnome_id.map(str::to_owned),
            xdg_current_desktop: xdg.map(str::to_owned),
            desktop_session: desktop_session.map(str::to_owned),
        }
    }

    #[test]
    fn kde_takes_priority() {
        let env = session(Some("true"), None, Some("GNOME"), None);
        assert_eq!(DesktopEnvironment::classify(&env), Some(DesktopEnvironment::Kde));
    }

    #[test]
    fn kde_requires_the_exact_true_value() {
        let env = session(Some("1"), None, None, None);
        assert_eq!(DesktopEnvironment::classify(&env), None);
    }

    #[test]
    fn gnome_by_session_id_or_xdg() {
        let env = session(None, Some("this-is-deprecated"), None, None);
        assert_eq!(DesktopEnvironment::classify(&env), Some(DesktopEnvironment::Gnome));

        // XDG_CURRENT_DESKTOP 的匹配大小写不敏感且允许复合值
        let env = session(None, None, Some("ubuntu:gnome"), None);
        assert_eq!(DesktopEnvironment::classify(&env), Some(DesktopEnvironment::Gnome));
    }

    #[test]
    fn session_names_map_to_environments() {
        let env = session(None, None, None, Some("Lubuntu"));
        assert_eq!(DesktopEnvironment::classify(&env), Some(DesktopEnvironment::Lubuntu));

        let env = session(None, None, None, Some("mate"));
        assert_eq!(DesktopEnvironment::classify(&env), Some(DesktopEnvironment::Mate));

        for wm in ["i3", "leftwm", "dwm"] {
            let env = session(None, None, None, Some(wm));
            assert_eq!(DesktopEnvironment::classify(&env), Some(DesktopEnvironment::Tiling));
        }
    }

    #[test]
    fn unknown_session_yields_none() {
        assert_eq!(DesktopEnvironment::classify(&SessionEnv::default()), None);

        let env = session(None, None, Some("Hyprland"), Some("hyprland"));
        assert_eq!(DesktopEnvironment::classify(&env), None);
    }

    #[test]
    fn gnome_invocations_write_both_uris() {
        let commands = DesktopEnvironment::Gnome.invocations("/tmp/w.jpg");
        assert_eq!(commands.len(), 2);
        let args: Vec<Vec<String>> = commands
            .iter()
            .map(|c| c.get_args().map(|a| a.to_string_lossy().into_owned()).collect())
            .collect();
        assert!(args[0].contains(&"picture-uri".to_string()));
        assert!(args[1].contains(&"picture-uri-dark".to_string()));
        assert!(args[0].contains(&"file:///tmp/w.jpg".to_string()));
    }

    #[test]
    fn tiling_uses_feh() {
        let commands = DesktopEnvironment::Tiling.invocations("/tmp/w.jpg");
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].get_program(), "feh");
    }

    #[test]
    fn macos_script_targets_all_desktops_or_one() {
        let all = macos_invocation("/tmp/w.jpg", 0);
        let script = all.get_args().nth(1).expect("script").to_string_lossy().into_owned();
        assert!(script.contains("repeat with desktopNumber"));

        let one = macos_invocation("/tmp/w.jpg", 2);
        let script = one.get_args().nth(1).expect("script").to_string_lossy().into_owned();
        assert!(script.contains("tell desktop 2"));
        assert!(!script.contains("repeat"));
    }
}
