// cli.rs - Command-line interface configuration
use clap::Parser;

pub const TRANSFORM_HELP: &str = "\
Transformations are applied to the preceding FILE in the order they are listed.
Example: stl-to-text foo.stl -x=50 bar.stl -ry=2

Transforms:
  -x=, -y=, -z=           translate the preceding object by the number of
                          cells that follows the equals sign
  -s=, -sx=, -sy=, -sz=   scale the preceding object by the factor that
                          follows the equals sign; -s scales all axes equally
  -rx=, -ry=, -rz=        rotate the preceding object by the number of
                          radians that follows the equals sign";

#[derive(Parser, Debug, Clone)]
#[command(name = "stl-to-text", version)]
#[command(about = "Display meshes encoded by binary STL files as shaded text")]
#[command(
    override_usage = "stl-to-text [--width <COLS>] [--height <ROWS>] [--orthographic] FILE [OPTIONS]... [FILE [OPTIONS]...]..."
)]
#[command(after_help = TRANSFORM_HELP)]
pub struct Cli {
    /// Output width in cells (defaults to the terminal width)
    #[arg(long, value_name = "COLS")]
    pub width: Option<u16>,

    /// Output height in cells (defaults to the terminal height)
    #[arg(long, value_name = "ROWS")]
    pub height: Option<u16>,

    /// Disable perspective foreshortening
    #[arg(long, default_value = "false")]
    pub orthographic: bool,

    /// STL files, each followed by the transforms to apply to it
    #[arg(value_name = "FILE [OPTIONS]", trailing_var_arg = true, allow_hyphen_values = true)]
    pub objects: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_transform_flags_are_captured_raw() {
        let cli = Cli::parse_from(["stl-to-text", "--width", "80", "a.stl", "-x=5", "-rz=1.5", "b.stl"]);
        assert_eq!(cli.width, Some(80));
        assert_eq!(cli.height, None);
        assert_eq!(cli.objects, vec!["a.stl", "-x=5", "-rz=1.5", "b.stl"]);
    }

    #[test]
    fn test_no_arguments() {
        let cli = Cli::parse_from(["stl-to-text"]);
        assert!(cli.objects.is_empty());
        assert!(!cli.orthographic);
    }
}
