// ============================================================
// Layer 5 - Multi-Head Self-Attention
// ============================================================
// Burn's MultiHeadAttention splits d_model evenly across heads,
// so each head's key size is d_model / n_heads. The encoder
// blocks here need a free key size instead: with 3 sensor
// features, 5 heads and a key size of 100 the queries, keys
// and values live in a 500-wide space that is projected back
// to the 3 input features at the end.
//
//   x [batch, T, d_input]
//     → Q, K, V = Linear(d_input → heads × head_size)
//     → split heads                       [batch, heads, T, head_size]
//     → softmax(Q·Kᵀ / √head_size)        [batch, heads, T, T]
//     → dropout on attention weights
//     → weights · V, merge heads          [batch, T, heads × head_size]
//     → Linear(heads × head_size → d_input)
//
// Reference: Vaswani et al. (2017) Attention Is All You Need

use burn::{
    nn::{Dropout, DropoutConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::softmax,
};

#[derive(Config, Debug)]
pub struct SelfAttentionConfig {
    /// Feature width of the input and output
    pub d_input:   usize,
    pub num_heads: usize,
    /// Size of each head's query/key/value vectors
    pub head_size: usize,
    #[config(default = 0.0)]
    pub dropout:   f64,
}

impl SelfAttentionConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SelfAttention<B> {
        let inner = self.num_heads * self.head_size;
        SelfAttention {
            query:     LinearConfig::new(self.d_input, inner).init(device),
            key:       LinearConfig::new(self.d_input, inner).init(device),
            value:     LinearConfig::new(self.d_input, inner).init(device),
            output:    LinearConfig::new(inner, self.d_input).init(device),
            dropout:   DropoutConfig::new(self.dropout).init(),
            num_heads: self.num_heads,
            head_size: self.head_size,
        }
    }
}

#[derive(Module, Debug)]
pub struct SelfAttention<B: Backend> {
    pub query:     Linear<B>,
    pub key:       Linear<B>,
    pub value:     Linear<B>,
    pub output:    Linear<B>,
    pub dropout:   Dropout,
    pub num_heads: usize,
    pub head_size: usize,
}

impl<B: Backend> SelfAttention<B> {
    /// x: [batch, seq_len, d_input] → [batch, seq_len, d_input]
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let [batch, seq_len, _] = x.dims();

        let q = self.split_heads(self.query.forward(x.clone()), batch, seq_len);
        let k = self.split_heads(self.key.forward(x.clone()), batch, seq_len);
        let v = self.split_heads(self.value.forward(x), batch, seq_len);

        let scale   = 1.0 / (self.head_size as f32).sqrt();
        let scores  = q.matmul(k.transpose()).mul_scalar(scale);
        let weights = self.dropout.forward(softmax(scores, 3));

        let context = weights
            .matmul(v)
            .swap_dims(1, 2)
            .reshape([batch, seq_len, self.num_heads * self.head_size]);

        self.output.forward(context)
    }

    // [batch, seq, heads × size] → [batch, heads, seq, size]
    fn split_heads(&self, x: Tensor<B, 3>, batch: usize, seq_len: usize) -> Tensor<B, 4> {
        x.reshape([batch, seq_len, self.num_heads, self.head_size])
            .swap_dims(1, 2)
    }
}
