//////////////////////////////////////////////////////////////////////
// pattern files: one keyword per line, '#' comments, each keyword
// set at most once. see parse_keyword for the list.

use std::io::BufRead;
use std::path::Path;

use phf::phf_map;

use crate::errors::*;
use crate::geometry::TilingParameters;
use crate::render::{OutputFormat, RenderSettings};
use crate::DEG;

//////////////////////////////////////////////////////////////////////
// named parameter sets

type ParamFunc = fn() -> TilingParameters;

fn figure_15c() -> TilingParameters {
    TilingParameters::general_degrees(120.0, 3, 5)
}

fn pentagon() -> TilingParameters {
    TilingParameters::regular_degrees(30.0, 5)
}

static PRESETS: phf::Map<&'static str, ParamFunc> = phf_map! {
    "figure_15c" => figure_15c,
    "pentagon" => pentagon,
};

static FORMAT_LOOKUP: phf::Map<&'static str, OutputFormat> = phf_map! {
    "pdf" => OutputFormat::Pdf,
    "png" => OutputFormat::Png,
};

//////////////////////////////////////////////////////////////////////
// macro for parsing the tokens following a keyword

macro_rules! parse_tokens {

    // finalizer - no more input to match, just error if remaining
    // input or return collected outputs
    ($it:ident { } -> { $($tuple:ident,)* } ) => (
        match $it.next() {
            Some(value) => Err(format!("found extra token(s) starting with \"{:}\"", value)),
            None => Ok(($($tuple),*))
        }
    );

    // string literal
    ($it:ident { $str:literal, $($ts:tt)* } -> { $($tuple:ident,)* } ) => (
        match $it.next() {
            None => Err(format!("missing token \"{:}\"", $str) ),
            Some(value) => if value == &$str {
                parse_tokens!( $it { $($ts)* } -> { $($tuple,)* } )
            } else {
                Err(format!("unmatched string literal: expected \"{:}\" but got \"{:}\"", $str, value))
            }
        }
    );

    // string map
    ($it:ident { $name:ident from $map:expr, $($ts:tt)* } -> { $($tuple:ident,)* } ) => (
        match $it.next() {
            None => Err(format!("missing token for {:}", stringify!($name)) ),
            Some(&value) => {
                if let Some(&$name) = $map.get(value) {
                    parse_tokens!( $it { $($ts)* } -> { $($tuple,)* $name, } )
                } else {
                    let mut extended: Vec<&str> = Vec::new();
                    extended.extend($map.keys());
                    extended.sort();
                    Err(format!("unexpected value \"{:}\" for {:}, expected one of: {{\"{:}\"}}",
                                value, stringify!($name), extended.join("\", \"") ))
                }
            }
        }
    );

    // name, type pair
    ($it:ident { $name:ident : $type:ident, $($ts:tt)* } -> { $($tuple:ident,)* } ) => (
        match $it.next() {
            None => Err(format!("missing token for {:}", stringify!($name)) ),
            Some(value) => if let Ok($name) = value.parse::<$type>() {
                parse_tokens!( $it { $($ts)* } -> { $($tuple,)* $name, } )
            } else {
                Err(format!("error parsing {:} as type {:}",
                            value, stringify!($type)))
            }
        }
    );

    // Entry point
    ($a:expr, { $($ts:tt)+ }) => (
        {
            let mut it = $a.iter();
            parse_tokens!( it { $($ts)* , } -> { } )
        }
    );

    // Entry point
    ($a:expr, { }) => (
        {
            let mut it = $a.iter();
            parse_tokens!( it { } -> { } )
        }
    )

}

//////////////////////////////////////////////////////////////////////
// macros for inspecting/validating individual fields of TilingSpec

macro_rules! copy_field {

    ($dst:ident, $src:ident, $field:ident, $null:expr) => (
        if $src.$field != $null {
            if $dst.$field != $null {
                bail!("{:} is already set", stringify!($field));
            }
            $dst.$field = $src.$field;
        }
    );

    ($dst:ident, $src:ident, $field:ident) => (
        if $src.$field.is_some() {
            if $dst.$field.is_some() {
                bail!("{:} is already set", stringify!($field));
            }
            $dst.$field = $src.$field;
        }
    )

}

macro_rules! ensure_field {

    ($ts:ident, $fvec:ident, $field:ident, $null:expr) => (
        if $ts.$field == $null {
            $fvec.push(stringify!($field));
        }
    )

}

//////////////////////////////////////////////////////////////////////

// degrees; start inclusive, stop exclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl Sweep {

    pub fn values(&self) -> Vec<f64> {

        let count = ((self.stop - self.start) / self.step).ceil().max(0.0) as usize;

        (0..count).map(|i| self.start + (i as f64) * self.step).collect()

    }

    fn is_integral(&self) -> bool {
        self.start.fract() == 0.0 && self.step.fract() == 0.0
    }

}

// one tiling to generate and the file to write it to
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub params: TilingParameters,
    pub filename: String,
}

#[derive(Debug, PartialEq)]
pub struct TilingSpec {
    pub params: Option<TilingParameters>,
    pub length: usize,                 // triangles per arm
    pub sweep: Option<Sweep>,          // optional sweep over the free angle
    pub format: Option<OutputFormat>,
    pub square: bool,
    pub image_width: f64,
    pub line_width: f64,
}

impl TilingSpec {

    fn new() -> TilingSpec {
        TilingSpec {
            params: None,
            length: usize::MAX,
            sweep: None,
            format: None,
            square: false,
            image_width: -1.0,
            line_width: -1.0,
        }
    }

    fn update(&mut self, other: TilingSpec) -> Result<()> {

        copy_field!(self, other, params);
        copy_field!(self, other, length, usize::MAX);
        copy_field!(self, other, sweep);
        copy_field!(self, other, format);
        copy_field!(self, other, square, false);
        copy_field!(self, other, image_width, -1.0);
        copy_field!(self, other, line_width, -1.0);

        Ok(())

    }

    fn parse_keyword(keyword: &str,
                     rest: &[&str]) -> Result<TilingSpec> {

        let mut update = TilingSpec::new();

        match keyword {

            "general" => {

                let (c, n, m) = parse_tokens!(rest, {
                    "corner_deg", c: f64,
                    "depth", n: usize,
                    "arms", m: usize
                })?;

                update.params = Some(TilingParameters::general_degrees(c, n, m));

            },

            "regular" => {

                let (a, m) = parse_tokens!(rest, {
                    "angle_deg", a: f64,
                    "arms", m: usize
                })?;

                update.params = Some(TilingParameters::regular_degrees(a, m));

            },

            "preset" => {

                let preset = parse_tokens!(rest, { preset from PRESETS })?;

                update.params = Some(preset());

            },

            "length" => {

                let length = parse_tokens!(rest, { length: usize })?;

                update.length = length;

            },

            "sweep_deg" => {

                let (start, stop, step) = parse_tokens!(rest, {
                    start: f64, stop: f64, step: f64
                })?;

                if !(step > 0.0) || !(stop > start) {
                    bail!("sweep needs start < stop and a positive step");
                }

                update.sweep = Some(Sweep { start: start, stop: stop, step: step });

            },

            "format" => {

                let format = parse_tokens!(rest, { format from FORMAT_LOOKUP })?;

                update.format = Some(format);

            },

            "square" => {

                parse_tokens!(rest, { })?;

                update.square = true;

            },

            "image_width" | "line_width" => {

                let width = parse_tokens!(rest, { width: f64 })?;

                if !(width > 0.0) {
                    bail!("{:} must be positive", keyword);
                }

                if keyword == "image_width" {
                    update.image_width = width;
                } else {
                    update.line_width = width;
                }

            },

            _ => {
                bail!("unrecognized keyword");
            }

        };

        Ok(update)

    }

    fn update_from(&mut self, line: &str) -> Result<()> {

        let mut trimmed = line.trim();

        if let Some(pos) = trimmed.find('#') {
            trimmed = &trimmed[0..pos];
        }

        if trimmed.trim().is_empty() {
            return Ok(());
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();

        let keyword = tokens[0];
        let rest = &tokens[1..];

        let update = Self::parse_keyword(keyword, rest).chain_err(
            || format!("while parsing keyword {:}", keyword))?;

        self.update(update)

    }

    pub fn parse(filename: &str, istr: &mut impl BufRead) -> Result<TilingSpec> {

        let mut ts = TilingSpec::new();
        let mut lineno = 0;

        loop {

            let mut line = String::new();

            lineno += 1;

            let len = istr.read_line(&mut line).chain_err(|| format!("{:}:{:}: read error", filename, lineno))?;

            if len == 0 {
                break;
            }

            ts.update_from(line.as_str()).chain_err(|| format!("{:}:{:}: parse error", filename, lineno))?;

        }

        let mut unset_fields = Vec::new();

        ensure_field!(ts, unset_fields, params, None);
        ensure_field!(ts, unset_fields, length, usize::MAX);

        if !unset_fields.is_empty() {
            bail!("{:}: the following field(s) were unset: {:}",
                  filename, unset_fields.as_slice().join(", "));
        }

        Ok(ts)

    }

    pub fn render_settings(&self) -> RenderSettings {

        let mut settings = RenderSettings::default();

        if let Some(format) = self.format {
            settings.format = format;
        }

        settings.square = self.square;

        if self.image_width > 0.0 {
            settings.width = self.image_width;
        }

        if self.line_width > 0.0 {
            settings.line_width = self.line_width;
        }

        settings

    }

    // everything to render for a pattern file with the given stem:
    // a single file, or one frame per sweep value inside a directory
    // named after the stem
    pub fn jobs(&self, stem: &str) -> Vec<Job> {

        let ext = self.format.unwrap_or(OutputFormat::Pdf).extension();

        let params = match self.params {
            Some(params) => params,
            None => return Vec::new()
        };

        match self.sweep {

            None => vec![Job {
                params: params,
                filename: format!("{:}.{:}", stem, ext)
            }],

            Some(sweep) => {

                let integral = sweep.is_integral();

                sweep.values().iter().enumerate().map(|(i, &angle)| {

                    let frame = if integral {
                        format!("{:02}.{:}", angle as i64, ext)
                    } else {
                        format!("{:03}.{:}", i, ext)
                    };

                    let filename = Path::new(stem).join(frame);

                    Job {
                        params: params.with_free_angle(angle * DEG),
                        filename: filename.to_string_lossy().into_owned()
                    }

                }).collect()

            }

        }

    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse_str(text: &str) -> Result<TilingSpec> {
        TilingSpec::parse("test.tile", &mut Cursor::new(text.as_bytes()))
    }

    #[test]
    fn parses_general_pattern() {

        let ts = parse_str("# figure 15c\n\
                            general corner_deg 120 depth 3 arms 5\n\
                            \n\
                            length 100   # per arm\n\
                            format png\n\
                            square\n").unwrap();

        assert_eq!(ts.params, Some(TilingParameters::general_degrees(120.0, 3, 5)));
        assert_eq!(ts.length, 100);
        assert_eq!(ts.format, Some(OutputFormat::Png));
        assert!(ts.square);

        let settings = ts.render_settings();
        assert_eq!(settings.format, OutputFormat::Png);
        assert!(settings.square);

        let jobs = ts.jobs("fig");
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].filename, "fig.png");

    }

    #[test]
    fn preset_matches_explicit_parameters() {
        let ts = parse_str("preset pentagon\nlength 10\n").unwrap();
        assert_eq!(ts.params, Some(TilingParameters::regular_degrees(30.0, 5)));
    }

    #[test]
    fn sweep_produces_one_job_per_angle() {

        let ts = parse_str("regular angle_deg 1 arms 5\n\
                            length 100\n\
                            sweep_deg 1 72 1\n\
                            format png\n").unwrap();

        let jobs = ts.jobs("pentagon_animation");

        assert_eq!(jobs.len(), 71);
        assert_eq!(jobs[0].params, TilingParameters::regular(1.0 * DEG, 5));
        assert_eq!(jobs[70].params, TilingParameters::regular(71.0 * DEG, 5));
        assert_eq!(Path::new(&jobs[6].filename),
                   Path::new("pentagon_animation").join("07.png"));

    }

    #[test]
    fn fractional_sweep_uses_frame_index() {
        let sweep = Sweep { start: 100.0, stop: 101.0, step: 0.25 };
        assert_eq!(sweep.values(), vec![100.0, 100.25, 100.5, 100.75]);
        assert!(!sweep.is_integral());
    }

    #[test]
    fn duplicate_keyword_is_an_error() {
        let err = parse_str("length 10\nlength 20\npreset pentagon\n").unwrap_err();
        assert!(err.to_string().contains("test.tile:2"));
    }

    #[test]
    fn missing_fields_are_reported() {
        let err = parse_str("square\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("params"));
        assert!(msg.contains("length"));
    }

    #[test]
    fn bad_tokens_are_errors() {
        assert!(parse_str("general corner_deg 120 depth 3\nlength 5\n").is_err());
        assert!(parse_str("general corner_deg abc depth 3 arms 5\nlength 5\n").is_err());
        assert!(parse_str("format gif\npreset pentagon\nlength 5\n").is_err());
        assert!(parse_str("preset nope\nlength 5\n").is_err());
        assert!(parse_str("square please\npreset pentagon\nlength 5\n").is_err());
        assert!(parse_str("sweep_deg 10 5 1\npreset pentagon\nlength 5\n").is_err());
        assert!(parse_str("bogus 1\n").is_err());
    }

}
