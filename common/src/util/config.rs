use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub penalties: PenaltyConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub ilp: IlpConfig,
    #[serde(default)]
    pub input: InputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            penalties: PenaltyConfig::default(),
            grid: GridConfig::default(),
            ilp: IlpConfig::default(),
            input: InputConfig::default(),
        }
    }
}

/// Drawing cost weights. `bend_pens` is indexed by deviation from a straight
/// pass in 45 degree steps: [straight, 45, 90, 135].
#[derive(Debug, Clone, Deserialize)]
pub struct PenaltyConfig {
    #[serde(default = "default_horizontal_pen")]
    pub horizontal: f64,
    #[serde(default = "default_vertical_pen")]
    pub vertical: f64,
    #[serde(default = "default_diagonal_pen")]
    pub diagonal: f64,
    #[serde(default = "default_bend_pens")]
    pub bend_pens: [f64; 4],
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            horizontal: default_horizontal_pen(),
            vertical: default_vertical_pen(),
            diagonal: default_diagonal_pen(),
            bend_pens: default_bend_pens(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
    #[serde(default = "default_port_offset")]
    pub port_offset: f64,
    #[serde(default = "default_hanan_iters")]
    pub hanan_iters: usize,
    #[serde(default = "default_padding_cells")]
    pub padding_cells: u32,
    #[serde(default = "default_heur_hop_cost")]
    pub heur_hop_cost: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: default_cell_size(),
            port_offset: default_port_offset(),
            hanan_iters: default_hanan_iters(),
            padding_cells: default_padding_cells(),
            heur_hop_cost: default_heur_hop_cost(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IlpConfig {
    /// Candidate cutoff in cells: a sink may host a station only if it lies
    /// strictly closer than `cell_size * max_gr_dist`.
    #[serde(default = "default_max_gr_dist")]
    pub max_gr_dist: f64,
    /// Solve time budget in seconds, negative = unlimited.
    #[serde(default = "default_time_lim")]
    pub time_lim: i64,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
    #[serde(default = "default_cache_threshold")]
    pub cache_threshold: f64,
    /// 0 = backend default.
    #[serde(default = "default_num_threads")]
    pub num_threads: u32,
    #[serde(default = "default_solver")]
    pub solver: String,
    /// Filename stem; if non-empty the model is dumped as `<stem>.mps` and
    /// the starter as `<stem>.mst`.
    #[serde(default = "default_model_path")]
    pub path: String,
    #[serde(default = "default_no_solve")]
    pub no_solve: bool,
}

impl Default for IlpConfig {
    fn default() -> Self {
        Self {
            max_gr_dist: default_max_gr_dist(),
            time_lim: default_time_lim(),
            cache_dir: default_cache_dir(),
            cache_threshold: default_cache_threshold(),
            num_threads: default_num_threads(),
            solver: default_solver(),
            path: default_model_path(),
            no_solve: default_no_solve(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_graph_file")]
    pub graph_file: String,
    #[serde(default = "default_output_drawing")]
    pub output_drawing: String,
    #[serde(default = "default_output_png")]
    pub output_png: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            graph_file: default_graph_file(),
            output_drawing: default_output_drawing(),
            output_png: default_output_png(),
        }
    }
}

fn default_horizontal_pen() -> f64 {
    1.0
}

fn default_vertical_pen() -> f64 {
    1.0
}

fn default_diagonal_pen() -> f64 {
    1.5
}

fn default_bend_pens() -> [f64; 4] {
    [0.0, 1.0, 1.5, 2.0]
}

fn default_cell_size() -> f64 {
    100.0
}

fn default_port_offset() -> f64 {
    10.0
}

fn default_hanan_iters() -> usize {
    1
}

fn default_padding_cells() -> u32 {
    1
}

fn default_heur_hop_cost() -> f64 {
    1.0
}

fn default_max_gr_dist() -> f64 {
    4.0
}

fn default_time_lim() -> i64 {
    600
}

fn default_cache_dir() -> String {
    String::new()
}

fn default_cache_threshold() -> f64 {
    0.0
}

fn default_num_threads() -> u32 {
    0
}

fn default_solver() -> String {
    "cbc".to_string()
}

fn default_model_path() -> String {
    String::new()
}

fn default_no_solve() -> bool {
    false
}

fn default_graph_file() -> String {
    "inputs/network.json".to_string()
}

fn default_output_drawing() -> String {
    "output/drawing.json".to_string()
}

fn default_output_png() -> String {
    "output/drawing.png".to_string()
}
